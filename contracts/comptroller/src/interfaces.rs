use soroban_sdk::{Address, Env};

use crate::errors::Error;

/// Normalized USD price source. Prices are scaled by `10^(36 - underlying_decimals)`.
#[soroban_sdk::contractclient(name = "PriceOracleClient")]
pub trait PriceOracle {
    fn get_underlying_price(e: Env, market: Address) -> Result<u128, Error>;
}

/// Interest rate curve. Returns the borrow rate per second as a 1e18 mantissa.
#[soroban_sdk::contractclient(name = "RateModelClient")]
pub trait RateModel {
    fn get_borrow_rate(e: Env, cash: u128, borrows: u128, reserves: u128) -> u128;
}

/// Vesting contract that receives the locked part of track-0 rewards. It keeps
/// its own copy of the claim start, pushed from here.
#[soroban_sdk::contractclient(name = "TokenLockClient")]
pub trait TokenLock {
    fn calc_lock_amount(e: Env, account: Address, amount: u128) -> (u128, u128);
    fn lock(e: Env, depositor: Address, account: Address, amount: u128);
    fn set_reward_claim_start(e: Env, timestamp: u64);
}
