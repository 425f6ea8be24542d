use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::constants::*;
use crate::errors::Error;

const TTL_THRESHOLD: u32 = 100_000;
const TTL_EXTEND_TO: u32 = 200_000;

#[contracttype]
pub enum DataKey {
    Config,
    AllMarkets,                      // Vec<Address>, listing order
    Market(Address),                 // Market
    Position(Address, Address),      // (account, market) -> Position
    AccountAssets(Address),          // Vec<Address> entered markets
    RewardToken(u32),                // track -> token
    RewardState(RewardKey),          // global index per market/side/track
    RewardIndex(RewardKey, Address), // account snapshot of the global index
    RewardAccrued(u32, Address),     // (track, account) -> staged amount
    Whitelisted(Address),            // bool, claim delegates
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    Supply,
    Borrow,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardKey {
    pub track: u32,
    pub market: Address,
    pub side: Side,
}

/// Admin-owned risk parameters. Loaded once per call.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ComptrollerConfig {
    pub admin: Address,
    pub oracle: Address,
    pub close_factor: u128,
    pub liquidation_incentive: u128,
    pub max_assets: u32,
    pub pause_guardian: Option<Address>,
    pub borrow_cap_guardian: Option<Address>,
    pub transfer_paused: bool,
    pub seize_paused: bool,
    pub token_lock: Option<Address>,
    pub reward_claim_start: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Market {
    pub underlying: Address,
    pub rate_model: Option<Address>,
    pub collateral_factor: u128,
    pub reserve_factor: u128,
    pub seize_share: u128,
    pub initial_exchange_rate: u128,
    pub total_supply: u128,
    pub total_borrows: u128,
    pub total_reserves: u128,
    /// Underlying held for this market. Tracked explicitly, never read from the token balance.
    pub cash: u128,
    pub borrow_index: u128,
    pub accrual_timestamp: u64,
    pub borrow_cap: u128,
    pub mint_paused: bool,
    pub borrow_paused: bool,
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Position {
    pub supply_shares: u128,
    pub borrow_principal: u128,
    pub borrow_index_snapshot: u128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardState {
    pub index: u128,
    pub speed: u128,
    pub timestamp: u64,
}

impl RewardState {
    pub fn new(now: u64) -> Self {
        RewardState {
            index: REWARD_INITIAL_INDEX,
            speed: 0,
            timestamp: now,
        }
    }
}

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn load_config(env: &Env) -> Result<ComptrollerConfig, Error> {
    let config = env
        .storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)?;
    bump_instance(env);
    Ok(config)
}

pub fn save_config(env: &Env, config: &ComptrollerConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

pub fn all_markets(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&DataKey::AllMarkets)
        .unwrap_or(Vec::new(env))
}

pub fn push_market(env: &Env, market: &Address) {
    let mut markets = all_markets(env);
    markets.push_back(market.clone());
    env.storage().instance().set(&DataKey::AllMarkets, &markets);
}

pub fn is_listed(env: &Env, market: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Market(market.clone()))
}

pub fn load_market(env: &Env, market: &Address) -> Result<Market, Error> {
    let key = DataKey::Market(market.clone());
    let m = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::UnknownMarket)?;
    bump_persistent(env, &key);
    Ok(m)
}

pub fn save_market(env: &Env, market: &Address, m: &Market) {
    let key = DataKey::Market(market.clone());
    env.storage().persistent().set(&key, m);
    bump_persistent(env, &key);
}

pub fn load_position(env: &Env, account: &Address, market: &Address) -> Position {
    let key = DataKey::Position(account.clone(), market.clone());
    match env.storage().persistent().get::<_, Position>(&key) {
        Some(position) => {
            bump_persistent(env, &key);
            position
        }
        None => Position::default(),
    }
}

pub fn save_position(env: &Env, account: &Address, market: &Address, position: &Position) {
    let key = DataKey::Position(account.clone(), market.clone());
    if *position == Position::default() {
        env.storage().persistent().remove(&key);
        return;
    }
    env.storage().persistent().set(&key, position);
    bump_persistent(env, &key);
}

pub fn account_assets(env: &Env, account: &Address) -> Vec<Address> {
    let key = DataKey::AccountAssets(account.clone());
    match env.storage().persistent().get::<_, Vec<Address>>(&key) {
        Some(assets) => {
            bump_persistent(env, &key);
            assets
        }
        None => Vec::new(env),
    }
}

pub fn set_account_assets(env: &Env, account: &Address, assets: &Vec<Address>) {
    let key = DataKey::AccountAssets(account.clone());
    env.storage().persistent().set(&key, assets);
    bump_persistent(env, &key);
}

pub fn reward_token(env: &Env, track: u32) -> Option<Address> {
    env.storage().instance().get(&DataKey::RewardToken(track))
}

pub fn set_reward_token(env: &Env, track: u32, token: &Address) {
    env.storage()
        .instance()
        .set(&DataKey::RewardToken(track), token);
}

pub fn reward_key(track: u32, market: &Address, side: Side) -> RewardKey {
    RewardKey {
        track,
        market: market.clone(),
        side,
    }
}

pub fn reward_state(env: &Env, key: &RewardKey) -> Option<RewardState> {
    let key = DataKey::RewardState(key.clone());
    let state = env.storage().persistent().get(&key);
    if state.is_some() {
        bump_persistent(env, &key);
    }
    state
}

pub fn save_reward_state(env: &Env, key: &RewardKey, state: &RewardState) {
    let key = DataKey::RewardState(key.clone());
    env.storage().persistent().set(&key, state);
    bump_persistent(env, &key);
}

pub fn account_reward_index(env: &Env, key: &RewardKey, account: &Address) -> u128 {
    env.storage()
        .persistent()
        .get(&DataKey::RewardIndex(key.clone(), account.clone()))
        .unwrap_or(REWARD_INITIAL_INDEX)
}

pub fn set_account_reward_index(env: &Env, key: &RewardKey, account: &Address, index: u128) {
    let key = DataKey::RewardIndex(key.clone(), account.clone());
    env.storage().persistent().set(&key, &index);
    bump_persistent(env, &key);
}

pub fn reward_accrued(env: &Env, track: u32, account: &Address) -> u128 {
    env.storage()
        .persistent()
        .get(&DataKey::RewardAccrued(track, account.clone()))
        .unwrap_or(0)
}

pub fn set_reward_accrued(env: &Env, track: u32, account: &Address, amount: u128) {
    let key = DataKey::RewardAccrued(track, account.clone());
    if amount == 0 {
        env.storage().persistent().remove(&key);
        return;
    }
    env.storage().persistent().set(&key, &amount);
    bump_persistent(env, &key);
}

pub fn is_whitelisted(env: &Env, delegate: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::Whitelisted(delegate.clone()))
        .unwrap_or(false)
}

pub fn set_whitelisted(env: &Env, delegate: &Address, allowed: bool) {
    let key = DataKey::Whitelisted(delegate.clone());
    if allowed {
        env.storage().persistent().set(&key, &true);
        bump_persistent(env, &key);
    } else {
        env.storage().persistent().remove(&key);
    }
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
