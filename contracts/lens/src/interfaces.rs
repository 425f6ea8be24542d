use soroban_sdk::{Address, Env, Vec};

use crate::errors::Error;

/// Claim surface of the comptroller.
#[soroban_sdk::contractclient(name = "RiskEngineClient")]
pub trait RiskEngine {
    fn claim_reward(e: Env, claimer: Address, track: u32, holder: Address) -> Result<u128, Error>;
    fn claim_reward_in_markets(
        e: Env,
        claimer: Address,
        track: u32,
        holder: Address,
        markets: Vec<Address>,
    ) -> Result<u128, Error>;
    fn reward_accrued(e: Env, track: u32, account: Address) -> u128;
    fn get_reward_token(e: Env, track: u32) -> Option<Address>;
}

/// Staking farm paying its own rewards per pool.
#[soroban_sdk::contractclient(name = "FarmClient")]
pub trait Farm {
    fn harvest(e: Env, claimer: Address, holder: Address, pool_id: u32, max_amount: u128) -> u128;
}

#[soroban_sdk::contractclient(name = "VestingClient")]
pub trait Vesting {
    fn locked_amount(e: Env, account: Address) -> u128;
    fn claimable_balance(e: Env, account: Address) -> Result<u128, Error>;
}
