use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::errors::Error;

const TTL_THRESHOLD: u32 = 100_000;
const TTL_EXTEND_TO: u32 = 200_000;

#[contracttype]
pub enum DataKey {
    Config,
    GlobalLock,            // Vec<u32> basis points per week
    UserLock(Address),     // Vec<u32>, replaces the global table for one account
    EarlyRedeems(Address), // u128 allowance before FIRST_REDEEM_WEEK
    Depositor(Address),    // bool
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub admin: Address,
    pub underlying: Address,
    pub comptroller: Address,
    /// Pushed by the comptroller whenever its claim start changes.
    pub reward_claim_start: u64,
}

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn load_config(env: &Env) -> Result<Config, Error> {
    let config = env
        .storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)?;
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
    Ok(config)
}

pub fn save_config(env: &Env, config: &Config) {
    env.storage().instance().set(&DataKey::Config, config);
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn global_lock(env: &Env) -> Vec<u32> {
    env.storage()
        .instance()
        .get(&DataKey::GlobalLock)
        .unwrap_or_else(|| lock_schedule::default_table(env))
}

pub fn set_global_lock(env: &Env, table: &Vec<u32>) {
    env.storage().instance().set(&DataKey::GlobalLock, table);
}

pub fn user_lock(env: &Env, account: &Address) -> Option<Vec<u32>> {
    let key = DataKey::UserLock(account.clone());
    let table = env.storage().persistent().get(&key);
    if table.is_some() {
        bump(env, &key);
    }
    table
}

pub fn set_user_lock(env: &Env, account: &Address, table: &Vec<u32>) {
    let key = DataKey::UserLock(account.clone());
    env.storage().persistent().set(&key, table);
    bump(env, &key);
}

pub fn early_redeems(env: &Env, account: &Address) -> u128 {
    env.storage()
        .persistent()
        .get(&DataKey::EarlyRedeems(account.clone()))
        .unwrap_or(0)
}

pub fn set_early_redeems(env: &Env, account: &Address, amount: u128) {
    let key = DataKey::EarlyRedeems(account.clone());
    if amount == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &amount);
        bump(env, &key);
    }
}

pub fn is_depositor(env: &Env, who: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::Depositor(who.clone()))
        .unwrap_or(false)
}

pub fn set_depositor(env: &Env, who: &Address, allowed: bool) {
    let key = DataKey::Depositor(who.clone());
    if allowed {
        env.storage().persistent().set(&key, &true);
        bump(env, &key);
    } else {
        env.storage().persistent().remove(&key);
    }
}

pub fn to_i128(amount: u128) -> Result<i128, Error> {
    i128::try_from(amount).map_err(|_| Error::MathOverflow)
}

fn bump(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
