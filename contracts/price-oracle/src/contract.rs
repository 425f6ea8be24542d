use soroban_sdk::{contract, contractimpl, Address, Env, Vec};

use crate::aggregator::AggregatorClient;
use crate::errors::Error;
use crate::events::*;
use crate::storage::{self, MainFeed, OracleConfig, RawPrice};
use crate::storage::{DEFAULT_VALID_PERIOD, MAIN_FEED_DECIMALS, PRICE_SCALE_DECIMALS};

#[contract]
pub struct PriceOracle;

#[contractimpl]
impl PriceOracle {
    pub fn initialize(env: Env, admin: Address, updaters: Vec<Address>) -> Result<(), Error> {
        if storage::has_config(&env) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();
        storage::save_config(
            &env,
            &OracleConfig {
                admin,
                valid_period: DEFAULT_VALID_PERIOD,
            },
        );
        for updater in updaters.iter() {
            storage::set_updater(&env, &updater, true);
            UpdaterUpdated {
                updater,
                allowed: true,
            }
            .publish(&env);
        }
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

    pub fn set_updater(env: Env, updater: Address, allowed: bool) -> Result<(), Error> {
        require_admin(&env)?;
        storage::set_updater(&env, &updater, allowed);
        UpdaterUpdated { updater, allowed }.publish(&env);
        Ok(())
    }

    pub fn is_updater(env: Env, updater: Address) -> bool {
        storage::is_updater(&env, &updater)
    }

    /// Main feed ingestion. `answer` carries 8 decimals of USD.
    pub fn update_main_feed_data(
        env: Env,
        updater: Address,
        market: Address,
        answer: i128,
        timestamp: u64,
    ) -> Result<(), Error> {
        updater.require_auth();
        storage::load_config(&env)?;
        if !storage::is_updater(&env, &updater) {
            return Err(Error::PermissionDenied);
        }
        if answer <= 0 || timestamp > env.ledger().timestamp() {
            return Err(Error::InvalidInput);
        }
        storage::set_main_feed(&env, &market, &MainFeed { answer, timestamp });
        MainFeedUpdated {
            market,
            updater,
            answer,
            timestamp,
        }
        .publish(&env);
        Ok(())
    }

    pub fn main_feed(env: Env, market: Address) -> Option<MainFeed> {
        storage::main_feed(&env, &market)
    }

    pub fn set_backup_feeds(
        env: Env,
        markets: Vec<Address>,
        feeds: Vec<Address>,
    ) -> Result<(), Error> {
        require_admin(&env)?;
        if markets.len() != feeds.len() {
            return Err(Error::InvalidInput);
        }
        for (market, feed) in markets.iter().zip(feeds.iter()) {
            storage::set_backup_feed(&env, &market, &feed);
            BackupFeedUpdated { market, feed }.publish(&env);
        }
        Ok(())
    }

    pub fn backup_feed(env: Env, market: Address) -> Option<Address> {
        storage::backup_feed(&env, &market)
    }

    pub fn set_underlying_decimals(
        env: Env,
        markets: Vec<Address>,
        decimals: Vec<u32>,
    ) -> Result<(), Error> {
        require_admin(&env)?;
        if markets.len() != decimals.len() {
            return Err(Error::InvalidInput);
        }
        for (market, dec) in markets.iter().zip(decimals.iter()) {
            if dec > PRICE_SCALE_DECIMALS {
                return Err(Error::InvalidInput);
            }
            storage::set_underlying_decimals(&env, &market, dec);
            UnderlyingDecimalsUpdated {
                market,
                decimals: dec,
            }
            .publish(&env);
        }
        Ok(())
    }

    pub fn underlying_decimals(env: Env, market: Address) -> Option<u32> {
        storage::underlying_decimals(&env, &market)
    }

    pub fn set_price_validity(env: Env, valid_period: u64) -> Result<(), Error> {
        let mut config = require_admin(&env)?;
        if valid_period == 0 {
            return Err(Error::InvalidInput);
        }
        config.valid_period = valid_period;
        storage::save_config(&env, &config);
        PriceValidityUpdated { valid_period }.publish(&env);
        Ok(())
    }

    pub fn valid_period(env: Env) -> Result<u64, Error> {
        Ok(storage::load_config(&env)?.valid_period)
    }

    /// Price of one base unit of the market's underlying, scaled by `10^(36 - underlying_decimals)`.
    pub fn get_underlying_price(env: Env, market: Address) -> Result<u128, Error> {
        let underlying_decimals =
            storage::underlying_decimals(&env, &market).ok_or(Error::UnknownMarket)?;
        let raw = Self::get_raw_underlying_price(env, market)?;
        let decimals = raw
            .decimals
            .checked_add(underlying_decimals)
            .ok_or(Error::MathOverflow)?;
        normalize(raw.answer, decimals)
    }

    /// Answer of whichever feed is authoritative right now, in that feed's own decimals.
    pub fn get_raw_underlying_price(env: Env, market: Address) -> Result<RawPrice, Error> {
        let config = storage::load_config(&env)?;
        let main = storage::main_feed(&env, &market);
        let backup = storage::backup_feed(&env, &market);
        if main.is_none() && backup.is_none() {
            return Err(Error::NoPriceFeed);
        }

        let now = env.ledger().timestamp();
        if let Some(feed) = main {
            if now.saturating_sub(feed.timestamp) <= config.valid_period && feed.answer > 0 {
                return Ok(RawPrice {
                    answer: feed.answer,
                    decimals: MAIN_FEED_DECIMALS,
                    is_from_main_feed: true,
                });
            }
        }

        let backup = backup.ok_or(Error::StalePrice)?;
        let client = AggregatorClient::new(&env, &backup);
        let round = client
            .try_latest_round_data()
            .map_err(|_| Error::StalePrice)?
            .map_err(|_| Error::StalePrice)?;
        if round.answer <= 0 {
            return Err(Error::StalePrice);
        }
        let decimals = client
            .try_decimals()
            .map_err(|_| Error::StalePrice)?
            .map_err(|_| Error::StalePrice)?;
        Ok(RawPrice {
            answer: round.answer,
            decimals,
            is_from_main_feed: false,
        })
    }
}

/// Rescales `answer` (carrying `decimals` total decimals) to the 36-decimal price scale.
fn normalize(answer: i128, decimals: u32) -> Result<u128, Error> {
    let answer = answer as u128;
    if decimals <= PRICE_SCALE_DECIMALS {
        answer
            .checked_mul(pow10(PRICE_SCALE_DECIMALS - decimals)?)
            .ok_or(Error::MathOverflow)
    } else {
        Ok(answer / pow10(decimals - PRICE_SCALE_DECIMALS)?)
    }
}

fn pow10(exp: u32) -> Result<u128, Error> {
    10u128.checked_pow(exp).ok_or(Error::MathOverflow)
}

fn require_admin(env: &Env) -> Result<OracleConfig, Error> {
    let config = storage::load_config(env)?;
    config.admin.require_auth();
    Ok(config)
}
