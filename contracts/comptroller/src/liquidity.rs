use soroban_sdk::{Address, Env, Map};

use crate::constants::*;
use crate::errors::Error;
use crate::interfaces::PriceOracleClient;
use crate::ledger;
use crate::math::{self, mul_div};
use crate::storage::{self, ComptrollerConfig, Market};

/// Prices read during one call. Each market is priced at most once so every
/// comparison inside the call sees the same value.
pub struct PriceSnapshot {
    oracle: Address,
    prices: Map<Address, u128>,
}

impl PriceSnapshot {
    pub fn new(env: &Env, config: &ComptrollerConfig) -> Self {
        PriceSnapshot {
            oracle: config.oracle.clone(),
            prices: Map::new(env),
        }
    }

    pub fn price(&mut self, env: &Env, market: &Address) -> Result<u128, Error> {
        if let Some(price) = self.prices.get(market.clone()) {
            return Ok(price);
        }
        let price = match PriceOracleClient::new(env, &self.oracle).try_get_underlying_price(market) {
            Ok(Ok(price)) => price,
            Err(Ok(err)) => return Err(err),
            _ => return Err(Error::StalePrice),
        };
        if price == 0 {
            return Err(Error::StalePrice);
        }
        self.prices.set(market.clone(), price);
        Ok(price)
    }
}

/// Pending change folded into a liquidity check.
pub struct Hypothetical<'a> {
    pub market: &'a Address,
    pub redeem_shares: u128,
    pub borrow_amount: u128,
}

/// `(liquidity, shortfall)` across every entered market, at most one of them non-zero.
pub fn account_liquidity(
    env: &Env,
    account: &Address,
    prices: &mut PriceSnapshot,
    change: Option<Hypothetical>,
) -> Result<(u128, u128), Error> {
    let mut collateral = 0u128;
    let mut debt = 0u128;
    for market in storage::account_assets(env, account).iter() {
        let m = storage::load_market(env, &market)?;
        let position = storage::load_position(env, account, &market);
        let owed = ledger::borrow_balance(env, &m, &position)?;
        let touched = change.as_ref().is_some_and(|c| *c.market == market);
        if position.supply_shares == 0 && owed == 0 && !touched {
            continue;
        }
        let price = prices.price(env, &market)?;
        let share_value = share_collateral_value(env, &m, price)?;

        collateral = math::add(
            collateral,
            mul_div(env, position.supply_shares, share_value, EXP_SCALE)?,
        )?;
        debt = math::add(debt, mul_div(env, owed, price, EXP_SCALE)?)?;

        if let Some(c) = change.as_ref().filter(|_| touched) {
            debt = math::add(debt, mul_div(env, c.redeem_shares, share_value, EXP_SCALE)?)?;
            debt = math::add(debt, mul_div(env, c.borrow_amount, price, EXP_SCALE)?)?;
        }
    }
    if collateral >= debt {
        Ok((collateral - debt, 0))
    } else {
        Ok((0, debt - collateral))
    }
}

/// Risk-adjusted USD value of one share, 1e18 mantissa per share unit.
fn share_collateral_value(env: &Env, m: &Market, price: u128) -> Result<u128, Error> {
    let rate = ledger::exchange_rate(env, m)?;
    let adjusted = mul_div(env, rate, m.collateral_factor, EXP_SCALE)?;
    mul_div(env, adjusted, price, EXP_SCALE)
}

/// Collateral shares to seize for repaying `repay_amount` of the borrowed market.
pub fn seize_tokens(
    env: &Env,
    config: &ComptrollerConfig,
    prices: &mut PriceSnapshot,
    repay_market: &Address,
    collateral_market: &Address,
    collateral: &Market,
    repay_amount: u128,
) -> Result<u128, Error> {
    let price_borrowed = prices.price(env, repay_market)?;
    let price_collateral = prices.price(env, collateral_market)?;
    let rate = ledger::exchange_rate(env, collateral)?;
    let repay_value = mul_div(env, repay_amount, price_borrowed, EXP_SCALE)?;
    let seize_value = mul_div(env, repay_value, config.liquidation_incentive, EXP_SCALE)?;
    let share_value = mul_div(env, price_collateral, rate, EXP_SCALE)?;
    mul_div(env, seize_value, EXP_SCALE, share_value)
}
