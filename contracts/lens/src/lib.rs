#![no_std]

mod contract;
mod errors;
mod events;
mod interfaces;

pub use contract::{Lens, LensClient, RewardBalances};
pub use errors::Error;
