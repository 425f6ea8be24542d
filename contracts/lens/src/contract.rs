use soroban_sdk::{contract, contractimpl, contracttype, token, Address, Env, Vec};

use crate::errors::Error;
use crate::events::RewardsClaimed;
use crate::interfaces::{FarmClient, RiskEngineClient, VestingClient};

const TRACKS: u32 = 2;

/// Reward position of one account across the comptroller, its reward tokens
/// and the token lock.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RewardBalances {
    /// Staged on track 0, not yet paid.
    pub accrued0: u128,
    /// Staged on track 1, not yet paid.
    pub accrued1: u128,
    /// Wallet balance of the track-0 reward token.
    pub balance0: i128,
    /// Wallet balance of the track-1 reward token.
    pub balance1: i128,
    pub locked: u128,
    pub claimable: u128,
}

/// Claim delegate. Must be whitelisted on the comptroller; every claim pays
/// the caller, never the lens.
#[contract]
pub struct Lens;

#[contractimpl]
impl Lens {
    /// Settles and claims both reward tracks of `caller` in every market, then
    /// harvests each of `pool_ids` from `farm`. Returns the granted amount per track.
    pub fn claim_rewards(
        env: Env,
        caller: Address,
        comptroller: Address,
        farm: Option<Address>,
        pool_ids: Vec<u32>,
    ) -> Result<(u128, u128), Error> {
        caller.require_auth();
        let granted = claim_tracks(&env, &caller, &comptroller, None)?;
        if let Some(farm) = farm {
            harvest(&env, &caller, &farm, &pool_ids);
        }
        publish_claim(&env, &caller, &comptroller, granted, pool_ids.len());
        Ok(granted)
    }

    /// Like `claim_rewards` without the farm, settling only `markets`.
    pub fn claim_rewards_in_markets(
        env: Env,
        caller: Address,
        comptroller: Address,
        markets: Vec<Address>,
    ) -> Result<(u128, u128), Error> {
        caller.require_auth();
        let granted = claim_tracks(&env, &caller, &comptroller, Some(&markets))?;
        publish_claim(&env, &caller, &comptroller, granted, 0);
        Ok(granted)
    }

    pub fn reward_balances(
        env: Env,
        comptroller: Address,
        token_lock: Option<Address>,
        account: Address,
    ) -> Result<RewardBalances, Error> {
        balances(&env, &comptroller, token_lock.as_ref(), &account)
    }

    /// Claims as `claim_rewards` does and reports the balances afterwards.
    pub fn claim_and_get_reward_balances(
        env: Env,
        caller: Address,
        comptroller: Address,
        token_lock: Option<Address>,
        farm: Option<Address>,
        pool_ids: Vec<u32>,
    ) -> Result<RewardBalances, Error> {
        Self::claim_rewards(env.clone(), caller.clone(), comptroller.clone(), farm, pool_ids)?;
        balances(&env, &comptroller, token_lock.as_ref(), &caller)
    }
}

fn claim_tracks(
    env: &Env,
    caller: &Address,
    comptroller: &Address,
    markets: Option<&Vec<Address>>,
) -> Result<(u128, u128), Error> {
    let engine = RiskEngineClient::new(env, comptroller);
    let this = env.current_contract_address();
    let mut granted = [0u128; TRACKS as usize];
    for (track, slot) in (0..TRACKS).zip(granted.iter_mut()) {
        let result = match markets {
            Some(markets) => engine.try_claim_reward_in_markets(&this, &track, caller, markets),
            None => engine.try_claim_reward(&this, &track, caller),
        };
        *slot = match result {
            Ok(Ok(amount)) => amount,
            Err(Ok(err)) => return Err(err),
            _ => return Err(Error::ClaimFailed),
        };
    }
    Ok((granted[0], granted[1]))
}

fn harvest(env: &Env, caller: &Address, farm: &Address, pool_ids: &Vec<u32>) {
    let farm = FarmClient::new(env, farm);
    let this = env.current_contract_address();
    for pool_id in pool_ids.iter() {
        farm.harvest(&this, caller, &pool_id, &u128::MAX);
    }
}

fn balances(
    env: &Env,
    comptroller: &Address,
    token_lock: Option<&Address>,
    account: &Address,
) -> Result<RewardBalances, Error> {
    let engine = RiskEngineClient::new(env, comptroller);
    let wallet = |track: u32| match engine.get_reward_token(&track) {
        Some(reward) => token::Client::new(env, &reward).balance(account),
        None => 0,
    };
    let mut out = RewardBalances {
        accrued0: engine.reward_accrued(&0, account),
        accrued1: engine.reward_accrued(&1, account),
        balance0: wallet(0),
        balance1: wallet(1),
        ..Default::default()
    };
    if let Some(lock) = token_lock {
        let vesting = VestingClient::new(env, lock);
        out.locked = vesting.locked_amount(account);
        out.claimable = match vesting.try_claimable_balance(account) {
            Ok(Ok(amount)) => amount,
            Err(Ok(err)) => return Err(err),
            _ => return Err(Error::VestingFailed),
        };
    }
    Ok(out)
}

fn publish_claim(env: &Env, caller: &Address, comptroller: &Address, granted: (u128, u128), pools: u32) {
    RewardsClaimed {
        account: caller.clone(),
        comptroller: comptroller.clone(),
        locked_track: granted.0,
        direct_track: granted.1,
        pools,
    }
    .publish(env);
}
