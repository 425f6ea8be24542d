#![no_std]

mod contract;
mod errors;
mod events;
mod storage;

pub use contract::{TokenLock, TokenLockClient};
pub use errors::Error;
pub use storage::LockState;
