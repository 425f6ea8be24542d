use lock_schedule::WEEK;
use soroban_sdk::{contract, contractimpl, token, Address, Env, String, Vec};
use stellar_tokens::fungible::burnable::emit_burn;
use stellar_tokens::fungible::Base as TokenBase;

use crate::errors::Error;
use crate::events::*;
use crate::storage::{self, Config};

/// Week after the reward claim start from which redeeming is unrestricted.
pub const FIRST_REDEEM_WEEK: u64 = 49;

/// Transferable claim on locked underlying. Minted 1:1 on lock, burned on redeem.
#[contract]
pub struct LockedToken;

#[contractimpl]
impl LockedToken {
    pub fn initialize(
        env: Env,
        admin: Address,
        underlying: Address,
        comptroller: Address,
        name: String,
        symbol: String,
    ) -> Result<(), Error> {
        if storage::has_config(&env) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();
        let decimals = token::Client::new(&env, &underlying).decimals();
        TokenBase::set_metadata(&env, decimals, name, symbol);
        storage::save_config(
            &env,
            &Config {
                admin,
                underlying,
                comptroller,
                reward_claim_start: 0,
            },
        );
        storage::set_global_lock(&env, &lock_schedule::default_table(&env));
        Ok(())
    }

    pub fn name(env: Env) -> String {
        TokenBase::name(&env)
    }

    pub fn symbol(env: Env) -> String {
        TokenBase::symbol(&env)
    }

    pub fn decimals(env: Env) -> u32 {
        TokenBase::decimals(&env)
    }

    pub fn total_supply(env: Env) -> i128 {
        TokenBase::total_supply(&env)
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        TokenBase::balance(&env, &id)
    }

    pub fn allowance(env: Env, owner: Address, spender: Address) -> i128 {
        TokenBase::allowance(&env, &owner, &spender)
    }

    pub fn approve(
        env: Env,
        owner: Address,
        spender: Address,
        amount: i128,
        live_until_ledger: u32,
    ) {
        TokenBase::approve(&env, &owner, &spender, amount, live_until_ledger);
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) {
        TokenBase::transfer(&env, &from, &to, amount);
    }

    pub fn transfer_from(env: Env, spender: Address, from: Address, to: Address, amount: i128) {
        TokenBase::transfer_from(&env, &spender, &from, &to, amount);
    }

    pub fn underlying(env: Env) -> Result<Address, Error> {
        Ok(storage::load_config(&env)?.underlying)
    }

    pub fn reward_claim_start(env: Env) -> Result<u64, Error> {
        Ok(storage::load_config(&env)?.reward_claim_start)
    }

    /// Pushed by the comptroller; redeeming and the lock table count weeks from it.
    pub fn set_reward_claim_start(env: Env, timestamp: u64) -> Result<(), Error> {
        let mut config = storage::load_config(&env)?;
        config.comptroller.require_auth();
        config.reward_claim_start = timestamp;
        storage::save_config(&env, &config);
        RewardClaimStartUpdated { timestamp }.publish(&env);
        Ok(())
    }

    /// Pulls `amount` underlying from `from` and mints the same amount of locked tokens to `to`.
    pub fn lock_underlying(env: Env, from: Address, to: Address, amount: u128) -> Result<(), Error> {
        from.require_auth();
        let config = storage::load_config(&env)?;
        if amount == 0 {
            return Err(Error::InvalidInput);
        }
        let value = storage::to_i128(amount)?;
        token::Client::new(&env, &config.underlying).transfer(
            &from,
            &env.current_contract_address(),
            &value,
        );
        TokenBase::mint(&env, &to, value);
        LockedIn { from, to, amount }.publish(&env);
        Ok(())
    }

    /// Mints locked tokens against underlying a depositor already sent to this contract.
    pub fn lock(env: Env, depositor: Address, account: Address, amount: u128) -> Result<(), Error> {
        depositor.require_auth();
        let config = storage::load_config(&env)?;
        if depositor != config.comptroller && !storage::is_depositor(&env, &depositor) {
            return Err(Error::PermissionDenied);
        }
        if amount == 0 {
            return Ok(());
        }
        let value = storage::to_i128(amount)?;
        let held = token::Client::new(&env, &config.underlying)
            .balance(&env.current_contract_address());
        let backed = TokenBase::total_supply(&env)
            .checked_add(value)
            .ok_or(Error::MathOverflow)?;
        if held < backed {
            return Err(Error::Underfunded);
        }
        TokenBase::mint(&env, &account, value);
        LockedIn {
            from: depositor,
            to: account,
            amount,
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

    pub fn set_global_lock(env: Env, weeks: Vec<u32>, values: Vec<u32>) -> Result<(), Error> {
        require_admin(&env)?;
        let mut table = storage::global_lock(&env);
        lock_schedule::apply_updates(&mut table, &weeks, &values)?;
        storage::set_global_lock(&env, &table);
        GlobalLockUpdated { weeks, values }.publish(&env);
        Ok(())
    }

    /// Gives `account` its own table, seeded from the global one on first use.
    pub fn set_user_lock(
        env: Env,
        account: Address,
        weeks: Vec<u32>,
        values: Vec<u32>,
    ) -> Result<(), Error> {
        require_admin(&env)?;
        let mut table =
            storage::user_lock(&env, &account).unwrap_or_else(|| storage::global_lock(&env));
        lock_schedule::apply_updates(&mut table, &weeks, &values)?;
        storage::set_user_lock(&env, &account, &table);
        UserLockUpdated {
            account,
            weeks,
            values,
        }
        .publish(&env);
        Ok(())
    }

    pub fn global_lock(env: Env, week: u32) -> u32 {
        storage::global_lock(&env).get(week).unwrap_or(0)
    }

    pub fn user_lock(env: Env, account: Address, week: u32) -> u32 {
        storage::user_lock(&env, &account)
            .unwrap_or_else(|| storage::global_lock(&env))
            .get(week)
            .unwrap_or(0)
    }

    pub fn calc_lock_amount(env: Env, account: Address, amount: u128) -> Result<(u128, u128), Error> {
        let config = storage::load_config(&env)?;
        let table =
            storage::user_lock(&env, &account).unwrap_or_else(|| storage::global_lock(&env));
        Ok(lock_schedule::split(
            &table,
            config.reward_claim_start,
            None,
            env.ledger().timestamp(),
            amount,
        ))
    }

    pub fn add_early_redeems(
        env: Env,
        accounts: Vec<Address>,
        amounts: Vec<u128>,
    ) -> Result<(), Error> {
        require_admin(&env)?;
        if accounts.len() != amounts.len() {
            return Err(Error::InvalidInput);
        }
        for (account, amount) in accounts.iter().zip(amounts.iter()) {
            let allowance = storage::early_redeems(&env, &account).saturating_add(amount);
            storage::set_early_redeems(&env, &account, allowance);
            EarlyRedeemsUpdated { account, allowance }.publish(&env);
        }
        Ok(())
    }

    pub fn reset_early_redeems(
        env: Env,
        accounts: Vec<Address>,
        amounts: Vec<u128>,
    ) -> Result<(), Error> {
        require_admin(&env)?;
        if accounts.len() != amounts.len() {
            return Err(Error::InvalidInput);
        }
        for (account, allowance) in accounts.iter().zip(amounts.iter()) {
            storage::set_early_redeems(&env, &account, allowance);
            EarlyRedeemsUpdated { account, allowance }.publish(&env);
        }
        Ok(())
    }

    pub fn early_redeems(env: Env, account: Address) -> u128 {
        storage::early_redeems(&env, &account)
    }

    /// Burns locked tokens of `account` and sends the underlying to `to`.
    ///
    /// `u128::MAX` redeems everything currently allowed. Before
    /// `FIRST_REDEEM_WEEK` the early-redeem allowance caps the amount.
    pub fn redeem(env: Env, account: Address, to: Address, amount: u128) -> Result<u128, Error> {
        account.require_auth();
        let config = storage::load_config(&env)?;
        let start = config.reward_claim_start;
        let now = env.ledger().timestamp();
        if now < start {
            return Err(Error::ClaimNotStarted);
        }

        let balance = TokenBase::balance(&env, &account).max(0) as u128;
        let early = (now - start) / WEEK < FIRST_REDEEM_WEEK;
        let mut redeem_amount = if amount == u128::MAX { balance } else { amount };
        if early {
            let allowance = storage::early_redeems(&env, &account);
            if amount == u128::MAX {
                redeem_amount = redeem_amount.min(allowance);
            } else if redeem_amount > allowance {
                return Err(Error::InsufficientEarlyRedeem);
            }
            storage::set_early_redeems(&env, &account, allowance - redeem_amount);
        }
        if redeem_amount > balance {
            return Err(Error::InsufficientBalance);
        }
        if redeem_amount == 0 {
            return Ok(0);
        }

        let value = storage::to_i128(redeem_amount)?;
        TokenBase::update(&env, Some(&account), None, value);
        emit_burn(&env, &account, value);
        token::Client::new(&env, &config.underlying).transfer(
            &env.current_contract_address(),
            &to,
            &value,
        );
        Redeemed {
            account,
            to,
            amount: redeem_amount,
            early,
        }
        .publish(&env);
        Ok(redeem_amount)
    }
}

fn require_admin(env: &Env) -> Result<Config, Error> {
    let config = storage::load_config(env)?;
    config.admin.require_auth();
    Ok(config)
}
