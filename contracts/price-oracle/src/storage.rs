use soroban_sdk::{contracttype, Address, Env};

use crate::errors::Error;

/// Decimals of answers pushed to the main feed.
pub const MAIN_FEED_DECIMALS: u32 = 8;
/// Prices are normalized so that `amount * price / 1e36` is a USD value in whole units.
pub const PRICE_SCALE_DECIMALS: u32 = 36;
pub const DEFAULT_VALID_PERIOD: u64 = 60 * 60;

const TTL_THRESHOLD: u32 = 100_000;
const TTL_EXTEND_TO: u32 = 200_000;

#[contracttype]
pub enum DataKey {
    Config,
    Updater(Address),            // bool
    MainFeed(Address),           // MainFeed per market
    BackupFeed(Address),         // aggregator address per market
    UnderlyingDecimals(Address), // u32 per market
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OracleConfig {
    pub admin: Address,
    pub valid_period: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MainFeed {
    pub answer: i128,
    pub timestamp: u64,
}

/// Un-normalized price together with the feed that produced it.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawPrice {
    pub answer: i128,
    pub decimals: u32,
    pub is_from_main_feed: bool,
}

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn load_config(env: &Env) -> Result<OracleConfig, Error> {
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

pub fn save_config(env: &Env, config: &OracleConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn is_updater(env: &Env, who: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::Updater(who.clone()))
        .unwrap_or(false)
}

pub fn set_updater(env: &Env, who: &Address, allowed: bool) {
    let key = DataKey::Updater(who.clone());
    if allowed {
        env.storage().persistent().set(&key, &true);
        bump(env, &key);
    } else {
        env.storage().persistent().remove(&key);
    }
}

pub fn main_feed(env: &Env, market: &Address) -> Option<MainFeed> {
    read(env, DataKey::MainFeed(market.clone()))
}

pub fn set_main_feed(env: &Env, market: &Address, feed: &MainFeed) {
    write(env, DataKey::MainFeed(market.clone()), feed);
}

pub fn backup_feed(env: &Env, market: &Address) -> Option<Address> {
    read(env, DataKey::BackupFeed(market.clone()))
}

pub fn set_backup_feed(env: &Env, market: &Address, feed: &Address) {
    write(env, DataKey::BackupFeed(market.clone()), feed);
}

pub fn underlying_decimals(env: &Env, market: &Address) -> Option<u32> {
    read(env, DataKey::UnderlyingDecimals(market.clone()))
}

pub fn set_underlying_decimals(env: &Env, market: &Address, decimals: u32) {
    write(env, DataKey::UnderlyingDecimals(market.clone()), &decimals);
}

fn read<V: soroban_sdk::TryFromVal<Env, soroban_sdk::Val>>(env: &Env, key: DataKey) -> Option<V> {
    let value = env.storage().persistent().get(&key);
    if value.is_some() {
        bump(env, &key);
    }
    value
}

fn write<V: soroban_sdk::IntoVal<Env, soroban_sdk::Val>>(env: &Env, key: DataKey, value: &V) {
    env.storage().persistent().set(&key, value);
    bump(env, &key);
}

fn bump(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
