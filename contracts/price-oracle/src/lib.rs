#![no_std]

mod aggregator;
mod contract;
mod errors;
mod events;
mod storage;

pub use aggregator::RoundData;
pub use contract::{PriceOracle, PriceOracleClient};
pub use errors::Error;
pub use storage::{MainFeed, RawPrice, DEFAULT_VALID_PERIOD, MAIN_FEED_DECIMALS};
