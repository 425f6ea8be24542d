use soroban_sdk::{contract, contractimpl, token, Address, Env, Vec};

use crate::errors::Error;
use crate::events::*;
use crate::storage::{self, LockConfig, LockState};

#[contract]
pub struct TokenLock;

#[contractimpl]
impl TokenLock {
    pub fn initialize(
        env: Env,
        admin: Address,
        token: Address,
        comptroller: Address,
    ) -> Result<(), Error> {
        if storage::has_config(&env) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();
        storage::save_config(
            &env,
            &LockConfig {
                admin,
                token,
                comptroller,
                reward_claim_start: 0,
            },
        );
        storage::set_percentage_lock(&env, &lock_schedule::default_table(&env));
        Ok(())
    }

    pub fn set_admin(env: Env, new_admin: Address) -> Result<(), Error> {
        let mut config = require_admin(&env)?;
        config.admin = new_admin.clone();
        storage::save_config(&env, &config);
        AdminUpdated { admin: new_admin }.publish(&env);
        Ok(())
    }

    pub fn get_admin(env: Env) -> Result<Address, Error> {
        Ok(storage::load_config(&env)?.admin)
    }

    pub fn token(env: Env) -> Result<Address, Error> {
        Ok(storage::load_config(&env)?.token)
    }

    pub fn reward_claim_start(env: Env) -> Result<u64, Error> {
        let config = storage::load_config(&env)?;
        Ok(config.reward_claim_start)
    }

    /// Mirrors the comptroller's claim start. Only the comptroller may push it.
    pub fn set_reward_claim_start(env: Env, timestamp: u64) -> Result<(), Error> {
        let mut config = storage::load_config(&env)?;
        config.comptroller.require_auth();
        config.reward_claim_start = timestamp;
        storage::save_config(&env, &config);
        RewardClaimStartUpdated { timestamp }.publish(&env);
        Ok(())
    }

    /// Overwrites the locked share for the given weeks (basis points).
    pub fn set_percentage_lock(env: Env, weeks: Vec<u32>, values: Vec<u32>) -> Result<(), Error> {
        require_admin(&env)?;
        let mut table = storage::percentage_lock(&env);
        lock_schedule::apply_updates(&mut table, &weeks, &values)?;
        storage::set_percentage_lock(&env, &table);
        PercentageLockUpdated { weeks, values }.publish(&env);
        Ok(())
    }

    pub fn percentage_lock(env: Env, week: u32) -> u32 {
        if week >= lock_schedule::LOCK_TABLE_WEEKS {
            return 0;
        }
        storage::percentage_lock(&env).get(week).unwrap_or(0)
    }

    /// Moves the account's unlock begin earlier. Later starts are rejected.
    pub fn set_earlier_unlock_start(env: Env, account: Address, timestamp: u64) -> Result<(), Error> {
        let config = require_admin(&env)?;
        let mut state = storage::lock_state(&env, &account);
        let (begin, _) = unlock_times(&config, &state);
        if timestamp >= begin {
            return Err(Error::BadTimestamp);
        }
        state.unlock_start_override = Some(timestamp);
        storage::set_lock_state(&env, &account, &state);
        UnlockStartUpdated {
            account,
            unlock_begin: timestamp,
        }
        .publish(&env);
        Ok(())
    }

    pub fn set_depositor(env: Env, depositor: Address, allowed: bool) -> Result<(), Error> {
        require_admin(&env)?;
        storage::set_depositor(&env, &depositor, allowed);
        DepositorUpdated { depositor, allowed }.publish(&env);
        Ok(())
    }

    pub fn is_depositor(env: Env, depositor: Address) -> bool {
        storage::is_depositor(&env, &depositor)
    }

    pub fn calc_unlock_times(env: Env, account: Address) -> Result<(u64, u64), Error> {
        let config = storage::load_config(&env)?;
        let state = storage::lock_state(&env, &account);
        Ok(unlock_times(&config, &state))
    }

    /// Splits a fresh grant into `(lock_amount, claim_amount)` at the current time.
    pub fn calc_lock_amount(env: Env, account: Address, amount: u128) -> Result<(u128, u128), Error> {
        let config = storage::load_config(&env)?;
        let state = storage::lock_state(&env, &account);
        let start = config.reward_claim_start;
        let (begin, _) = unlock_times(&config, &state);
        Ok(lock_schedule::split(
            &storage::percentage_lock(&env),
            start,
            Some(begin),
            env.ledger().timestamp(),
            amount,
        ))
    }

    /// Credits `amount` to the account's locked balance. The tokens must already
    /// be held by this contract on top of everything locked so far.
    pub fn lock(env: Env, depositor: Address, account: Address, amount: u128) -> Result<(), Error> {
        depositor.require_auth();
        let config = storage::load_config(&env)?;
        if depositor != config.comptroller && !storage::is_depositor(&env, &depositor) {
            return Err(Error::PermissionDenied);
        }
        if amount == 0 {
            return Ok(());
        }
        let total = storage::total_locked(&env)
            .checked_add(amount)
            .ok_or(Error::MathOverflow)?;
        let held = token::Client::new(&env, &config.token).balance(&env.current_contract_address());
        if held < storage::to_i128(total)? {
            return Err(Error::Underfunded);
        }
        let mut state = storage::lock_state(&env, &account);
        state.locked_amount = state
            .locked_amount
            .checked_add(amount)
            .ok_or(Error::MathOverflow)?;
        storage::set_lock_state(&env, &account, &state);
        storage::set_total_locked(&env, total);
        Locked {
            account,
            depositor,
            amount,
            locked_amount: state.locked_amount,
        }
        .publish(&env);
        Ok(())
    }

    /// Pays out the vested part of the locked balance and returns the amount paid.
    pub fn claim(env: Env, account: Address) -> Result<u128, Error> {
        account.require_auth();
        let config = storage::load_config(&env)?;
        let mut state = storage::lock_state(&env, &account);
        let amount = claimable(&env, &config, &state)?;
        if amount == 0 {
            return Ok(0);
        }
        state.locked_amount -= amount;
        state.claimed_amount += amount;
        storage::set_lock_state(&env, &account, &state);
        storage::set_total_locked(&env, storage::total_locked(&env).saturating_sub(amount));
        token::Client::new(&env, &config.token).transfer(
            &env.current_contract_address(),
            &account,
            &storage::to_i128(amount)?,
        );
        Claimed {
            account,
            amount,
            locked_amount: state.locked_amount,
        }
        .publish(&env);
        Ok(amount)
    }

    pub fn claimable_balance(env: Env, account: Address) -> Result<u128, Error> {
        let config = storage::load_config(&env)?;
        let state = storage::lock_state(&env, &account);
        claimable(&env, &config, &state)
    }

    pub fn locked_amount(env: Env, account: Address) -> u128 {
        storage::lock_state(&env, &account).locked_amount
    }

    pub fn claimed_amount(env: Env, account: Address) -> u128 {
        storage::lock_state(&env, &account).claimed_amount
    }

    pub fn unlock_start_override(env: Env, account: Address) -> Option<u64> {
        storage::lock_state(&env, &account).unlock_start_override
    }

    pub fn total_locked(env: Env) -> u128 {
        storage::total_locked(&env)
    }
}

fn require_admin(env: &Env) -> Result<LockConfig, Error> {
    let config = storage::load_config(env)?;
    config.admin.require_auth();
    Ok(config)
}

/// An override only counts while it is earlier than the default begin.
fn unlock_times(config: &LockConfig, state: &LockState) -> (u64, u64) {
    let default_begin = lock_schedule::default_unlock_begin(config.reward_claim_start);
    let begin = state
        .unlock_start_override
        .map_or(default_begin, |start| start.min(default_begin));
    (begin, lock_schedule::unlock_end(begin))
}

/// Linear release over `[unlock_begin, unlock_end]` of everything ever locked.
fn claimable(env: &Env, config: &LockConfig, state: &LockState) -> Result<u128, Error> {
    let (begin, end) = unlock_times(config, state);
    let now = env.ledger().timestamp();
    if now < begin || state.locked_amount == 0 {
        return Ok(0);
    }
    let duration = (end - begin) as u128;
    if duration == 0 {
        return Ok(state.locked_amount);
    }
    let elapsed = (now.min(end) - begin) as u128;
    let granted = state
        .locked_amount
        .checked_add(state.claimed_amount)
        .ok_or(Error::MathOverflow)?;
    let vested = granted
        .checked_mul(elapsed)
        .ok_or(Error::MathOverflow)?
        / duration;
    Ok(vested
        .saturating_sub(state.claimed_amount)
        .min(state.locked_amount))
}
