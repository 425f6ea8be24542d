#![no_std]

mod constants;
mod contract;
mod errors;
mod events;
mod interfaces;
mod ledger;
mod liquidity;
mod math;
mod rewards;
mod storage;

pub use constants::*;
pub use contract::{Comptroller, ComptrollerClient};
pub use errors::Error;
pub use storage::{ComptrollerConfig, Market, Position, RewardState, Side};

mod test;
#[cfg(test)]
mod test_rewards;
