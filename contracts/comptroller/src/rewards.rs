//! Two-track reward accrual.
//!
//! Each (market, side, track) keeps a global index that grows by
//! `speed * dt * 1e36 / total_weight`. An account settles by multiplying its
//! weight with the index growth since its own snapshot. Weights are supply
//! shares on the supply side and index-normalized debt on the borrow side.

use soroban_sdk::{token, Address, Env, Vec};

use crate::constants::*;
use crate::errors::Error;
use crate::events::{DistributedReward, RewardGranted};
use crate::interfaces::TokenLockClient;
use crate::ledger;
use crate::math::{self, mul_div};
use crate::storage::{self, ComptrollerConfig, Market, Position, RewardState, Side};

/// Account whose position takes part in a settled mutation.
pub struct Holder {
    pub account: Address,
    pub position: Position,
}

impl Holder {
    pub fn load(env: &Env, account: &Address, market: &Address) -> Self {
        Holder {
            account: account.clone(),
            position: storage::load_position(env, account, market),
        }
    }
}

pub fn side_weight(env: &Env, m: &Market, p: &Position, side: Side) -> Result<u128, Error> {
    match side {
        Side::Supply => Ok(p.supply_shares),
        Side::Borrow => ledger::normalized_borrow(env, m, p),
    }
}

pub fn side_total(env: &Env, m: &Market, side: Side) -> Result<u128, Error> {
    match side {
        Side::Supply => Ok(m.total_supply),
        Side::Borrow => ledger::total_normalized_borrows(env, m),
    }
}

/// Index state grown to `now` without persisting it.
pub fn grown_state(
    env: &Env,
    market: &Address,
    m: &Market,
    side: Side,
    track: u32,
) -> Result<RewardState, Error> {
    let now = env.ledger().timestamp();
    let key = storage::reward_key(track, market, side);
    let mut state = storage::reward_state(env, &key).unwrap_or(RewardState::new(now));
    if now <= state.timestamp {
        return Ok(state);
    }
    let elapsed = (now - state.timestamp) as u128;
    if state.speed > 0 {
        let total = side_total(env, m, side)?;
        if total > 0 {
            let emitted = state.speed.checked_mul(elapsed).ok_or(Error::MathOverflow)?;
            let growth = mul_div(env, emitted, REWARD_INITIAL_INDEX, total)?;
            state.index = math::add(state.index, growth)?;
        }
    }
    state.timestamp = now;
    Ok(state)
}

pub fn update_index(
    env: &Env,
    market: &Address,
    m: &Market,
    side: Side,
    track: u32,
) -> Result<RewardState, Error> {
    let state = grown_state(env, market, m, side, track)?;
    storage::save_reward_state(env, &storage::reward_key(track, market, side), &state);
    Ok(state)
}

/// Credits `weight * (index - snapshot) / 1e36` to the account and moves its snapshot.
fn settle(
    env: &Env,
    market: &Address,
    side: Side,
    track: u32,
    index: u128,
    account: &Address,
    weight: u128,
) -> Result<u128, Error> {
    let key = storage::reward_key(track, market, side);
    let snapshot = storage::account_reward_index(env, &key, account);
    if snapshot == index {
        return Ok(0);
    }
    let delta = mul_div(env, weight, index.saturating_sub(snapshot), REWARD_INITIAL_INDEX)?;
    storage::set_account_reward_index(env, &key, account, index);
    if delta > 0 {
        let accrued = math::add(storage::reward_accrued(env, track, account), delta)?;
        storage::set_reward_accrued(env, track, account, accrued);
        DistributedReward {
            market: market.clone(),
            account: account.clone(),
            track,
            side,
            delta,
            index,
        }
        .publish(env);
    }
    Ok(delta)
}

/// Grows both tracks of one side and settles each holder against them.
pub fn settle_side(
    env: &Env,
    market: &Address,
    m: &Market,
    side: Side,
    holders: &[Holder],
) -> Result<(), Error> {
    for track in 0..REWARD_TRACKS {
        let state = update_index(env, market, m, side, track)?;
        for holder in holders {
            let weight = side_weight(env, m, &holder.position, side)?;
            settle(env, market, side, track, state.index, &holder.account, weight)?;
        }
    }
    Ok(())
}

/// Settles every holder on `side`, applies `mutate`, then persists the market
/// and the holders' positions. All weight changes go through here.
pub fn settle_then_mutate<T, F>(
    env: &Env,
    market: &Address,
    m: &mut Market,
    side: Side,
    holders: &mut [Holder],
    mutate: F,
) -> Result<T, Error>
where
    F: FnOnce(&mut Market, &mut [Holder]) -> Result<T, Error>,
{
    settle_side(env, market, m, side, holders)?;
    let out = mutate(m, holders)?;
    storage::save_market(env, market, m);
    for holder in holders.iter() {
        storage::save_position(env, &holder.account, market, &holder.position);
    }
    Ok(out)
}

/// Settles both sides of `markets` for `account` on one track.
pub fn settle_markets(
    env: &Env,
    account: &Address,
    markets: &Vec<Address>,
    track: u32,
) -> Result<(), Error> {
    for market in markets.iter() {
        let m = storage::load_market(env, &market)?;
        let position = storage::load_position(env, account, &market);
        for side in [Side::Supply, Side::Borrow] {
            let state = update_index(env, &market, &m, side, track)?;
            let weight = side_weight(env, &m, &position, side)?;
            settle(env, &market, side, track, state.index, account, weight)?;
        }
    }
    Ok(())
}

/// Staged plus unsettled accrual, computed without writes.
pub fn pending(env: &Env, account: &Address, track: u32) -> Result<u128, Error> {
    let mut total = storage::reward_accrued(env, track, account);
    for market in storage::all_markets(env).iter() {
        let m = storage::load_market(env, &market)?;
        let position = storage::load_position(env, account, &market);
        for side in [Side::Supply, Side::Borrow] {
            let state = grown_state(env, &market, &m, side, track)?;
            let key = storage::reward_key(track, &market, side);
            let snapshot = storage::account_reward_index(env, &key, account);
            let weight = side_weight(env, &m, &position, side)?;
            let delta = mul_div(
                env,
                weight,
                state.index.saturating_sub(snapshot),
                REWARD_INITIAL_INDEX,
            )?;
            total = math::add(total, delta)?;
        }
    }
    Ok(total)
}

/// Reward tokens held beyond the cash of any market that lends the same token.
fn available_reward(env: &Env, reward_token: &Address) -> Result<u128, Error> {
    let held = token::Client::new(env, reward_token).balance(&env.current_contract_address());
    let held = if held > 0 { held as u128 } else { 0 };
    let reserved = match storage::load_market(env, reward_token) {
        Ok(m) => m.cash,
        Err(_) => 0,
    };
    Ok(held.saturating_sub(reserved))
}

/// Pays out the staged amount of `track`. Keeps it staged before the claim
/// start or when the reward balance cannot cover it. Returns the amount granted.
pub fn grant(
    env: &Env,
    config: &ComptrollerConfig,
    account: &Address,
    track: u32,
) -> Result<u128, Error> {
    let amount = storage::reward_accrued(env, track, account);
    if amount == 0 || env.ledger().timestamp() < config.reward_claim_start {
        return Ok(0);
    }
    let reward_token = match storage::reward_token(env, track) {
        Some(token) => token,
        None => return Ok(0),
    };
    if available_reward(env, &reward_token)? < amount {
        return Ok(0);
    }

    let token_client = token::Client::new(env, &reward_token);
    let this = env.current_contract_address();
    let (locked, claimed) = match (&config.token_lock, track) {
        (Some(lock), TRACK_LOCKED) => {
            let lock_client = TokenLockClient::new(env, lock);
            let (locked, claimed) = lock_client.calc_lock_amount(account, &amount);
            if locked > 0 {
                token_client.transfer(&this, lock, &math::to_i128(locked)?);
                lock_client.lock(&this, account, &locked);
            }
            (locked, claimed)
        }
        _ => (0, amount),
    };
    if claimed > 0 {
        token_client.transfer(&this, account, &math::to_i128(claimed)?);
    }
    storage::set_reward_accrued(env, track, account, 0);
    RewardGranted {
        account: account.clone(),
        track,
        claimed,
        locked,
    }
    .publish(env);
    Ok(amount)
}
