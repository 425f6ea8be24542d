#![no_std]

mod contract;
mod errors;
mod events;
mod storage;

pub use contract::{LockedToken, LockedTokenClient, FIRST_REDEEM_WEEK};
pub use errors::Error;
