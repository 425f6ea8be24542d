use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::errors::Error;

const TTL_THRESHOLD: u32 = 100_000;
const TTL_EXTEND_TO: u32 = 200_000;

#[contracttype]
pub enum DataKey {
    Config,
    PercentageLock,     // Vec<u32> basis points per week
    TotalLocked,        // u128 still owed to lockers
    Account(Address),   // LockState
    Depositor(Address), // bool
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockConfig {
    pub admin: Address,
    /// Token being vested.
    pub token: Address,
    /// Reward distributor; always an accepted depositor.
    pub comptroller: Address,
    /// Copy of the comptroller's reward claim start, pushed by the comptroller.
    pub reward_claim_start: u64,
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LockState {
    pub locked_amount: u128,
    pub claimed_amount: u128,
    pub unlock_start_override: Option<u64>,
}

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn load_config(env: &Env) -> Result<LockConfig, Error> {
    let config = env
        .storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)?;
    bump_instance(env);
    Ok(config)
}

pub fn save_config(env: &Env, config: &LockConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

pub fn percentage_lock(env: &Env) -> Vec<u32> {
    env.storage()
        .instance()
        .get(&DataKey::PercentageLock)
        .unwrap_or_else(|| lock_schedule::default_table(env))
}

pub fn set_percentage_lock(env: &Env, table: &Vec<u32>) {
    env.storage().instance().set(&DataKey::PercentageLock, table);
}

pub fn total_locked(env: &Env) -> u128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalLocked)
        .unwrap_or(0)
}

pub fn set_total_locked(env: &Env, amount: u128) {
    env.storage().instance().set(&DataKey::TotalLocked, &amount);
}

pub fn lock_state(env: &Env, account: &Address) -> LockState {
    let key = DataKey::Account(account.clone());
    match env.storage().persistent().get::<_, LockState>(&key) {
        Some(state) => {
            bump_persistent(env, &key);
            state
        }
        None => LockState::default(),
    }
}

pub fn set_lock_state(env: &Env, account: &Address, state: &LockState) {
    let key = DataKey::Account(account.clone());
    env.storage().persistent().set(&key, state);
    bump_persistent(env, &key);
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
        bump_persistent(env, &key);
    } else {
        env.storage().persistent().remove(&key);
    }
}

pub fn to_i128(amount: u128) -> Result<i128, Error> {
    i128::try_from(amount).map_err(|_| Error::MathOverflow)
}

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
