//! Market ledger: interest accrual and the share and debt arithmetic.

use soroban_sdk::{token, Address, Env};

use crate::constants::*;
use crate::errors::Error;
use crate::events::AccrueInterest;
use crate::interfaces::RateModelClient;
use crate::math::{self, mul_div};
use crate::storage::{self, Market, Position};

/// Underlying per share, 1e18 mantissa.
pub fn exchange_rate(env: &Env, m: &Market) -> Result<u128, Error> {
    if m.total_supply == 0 {
        return Ok(m.initial_exchange_rate);
    }
    let backing = math::add(m.cash, m.total_borrows)?.saturating_sub(m.total_reserves);
    mul_div(env, backing, EXP_SCALE, m.total_supply)
}

/// Current debt: `principal * borrow_index / snapshot`.
pub fn borrow_balance(env: &Env, m: &Market, p: &Position) -> Result<u128, Error> {
    if p.borrow_principal == 0 || p.borrow_index_snapshot == 0 {
        return Ok(0);
    }
    mul_div(env, p.borrow_principal, m.borrow_index, p.borrow_index_snapshot)
}

/// Debt expressed in units of the borrow index, the weight of the borrow side.
pub fn normalized_borrow(env: &Env, m: &Market, p: &Position) -> Result<u128, Error> {
    let owed = borrow_balance(env, m, p)?;
    mul_div(env, owed, EXP_SCALE, m.borrow_index)
}

pub fn total_normalized_borrows(env: &Env, m: &Market) -> Result<u128, Error> {
    mul_div(env, m.total_borrows, EXP_SCALE, m.borrow_index)
}

/// Grows borrows, reserves and the borrow index up to the current ledger time
/// and persists the market.
pub fn accrue_interest(env: &Env, market: &Address) -> Result<Market, Error> {
    let mut m = storage::load_market(env, market)?;
    let now = env.ledger().timestamp();
    if now <= m.accrual_timestamp {
        return Ok(m);
    }
    let elapsed = (now - m.accrual_timestamp) as u128;
    m.accrual_timestamp = now;

    let rate = match &m.rate_model {
        Some(model) => RateModelClient::new(env, model).get_borrow_rate(
            &m.cash,
            &m.total_borrows,
            &m.total_reserves,
        ),
        None => 0,
    };
    if rate > MAX_BORROW_RATE_PER_SECOND {
        return Err(Error::InvalidInput);
    }
    if rate == 0 || m.total_borrows == 0 {
        storage::save_market(env, market, &m);
        return Ok(m);
    }

    let factor = rate.checked_mul(elapsed).ok_or(Error::MathOverflow)?;
    let interest = mul_div(env, factor, m.total_borrows, EXP_SCALE)?;
    m.total_borrows = math::add(m.total_borrows, interest)?;
    m.total_reserves = math::add(
        m.total_reserves,
        mul_div(env, interest, m.reserve_factor, EXP_SCALE)?,
    )?;
    m.borrow_index = math::add(
        m.borrow_index,
        mul_div(env, factor, m.borrow_index, EXP_SCALE)?,
    )?;
    storage::save_market(env, market, &m);

    AccrueInterest {
        market: market.clone(),
        cash_prior: m.cash,
        interest_accumulated: interest,
        borrow_index: m.borrow_index,
        total_borrows: m.total_borrows,
    }
    .publish(env);
    Ok(m)
}

pub fn pull_underlying(env: &Env, m: &Market, from: &Address, amount: u128) -> Result<(), Error> {
    token::Client::new(env, &m.underlying).transfer(
        from,
        &env.current_contract_address(),
        &math::to_i128(amount)?,
    );
    Ok(())
}

pub fn push_underlying(env: &Env, m: &Market, to: &Address, amount: u128) -> Result<(), Error> {
    token::Client::new(env, &m.underlying).transfer(
        &env.current_contract_address(),
        to,
        &math::to_i128(amount)?,
    );
    Ok(())
}

pub fn add_cash(m: &mut Market, amount: u128) -> Result<(), Error> {
    m.cash = math::add(m.cash, amount)?;
    Ok(())
}

pub fn remove_cash(m: &mut Market, amount: u128) -> Result<(), Error> {
    m.cash = m.cash.checked_sub(amount).ok_or(Error::InsufficientCash)?;
    Ok(())
}

/// Rewrites the debt snapshot at the current index with `owed` as the new principal.
pub fn set_borrow(m: &Market, p: &mut Position, owed: u128) {
    p.borrow_principal = owed;
    p.borrow_index_snapshot = if owed == 0 { 0 } else { m.borrow_index };
}
