#![no_std]
//! Weekly lock table shared by the token lock and the locked reward token.
//!
//! Week `w` after the reward claim start locks `table[w]` basis points of a
//! newly granted amount. Weeks past the end of the table lock nothing.

use soroban_sdk::{Env, Vec};

pub const WEEK: u64 = 7 * 24 * 60 * 60;
pub const YEAR: u64 = 365 * 24 * 60 * 60;
pub const BPS_DENOMINATOR: u32 = 10_000;
/// Number of weeks covered by the lock table. Later weeks lock 0%.
pub const LOCK_TABLE_WEEKS: u32 = 48;
/// Weeks between the reward claim start and the default unlock begin.
pub const UNLOCK_DELAY_WEEKS: u64 = 49;
pub const VESTING_DURATION: u64 = YEAR;

const DEFAULT_FIRST_WEEK_BPS: u32 = 9_500;
const DEFAULT_WEEKLY_DECREASE_BPS: u32 = 200;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ScheduleError {
    LengthMismatch,
    ValueTooLarge,
    WeekOutOfRange,
}

/// 95% in week 0, two points less each following week.
pub fn default_table(env: &Env) -> Vec<u32> {
    let mut table = Vec::new(env);
    for week in 0..LOCK_TABLE_WEEKS {
        table.push_back(DEFAULT_FIRST_WEEK_BPS - DEFAULT_WEEKLY_DECREASE_BPS * week);
    }
    table
}

/// Writes `values[i]` into `table[weeks[i]]`. Either every entry is applied or none.
pub fn apply_updates(
    table: &mut Vec<u32>,
    weeks: &Vec<u32>,
    values: &Vec<u32>,
) -> Result<(), ScheduleError> {
    if weeks.len() != values.len() {
        return Err(ScheduleError::LengthMismatch);
    }
    for (week, value) in weeks.iter().zip(values.iter()) {
        if week >= LOCK_TABLE_WEEKS || week >= table.len() {
            return Err(ScheduleError::WeekOutOfRange);
        }
        if value > BPS_DENOMINATOR {
            return Err(ScheduleError::ValueTooLarge);
        }
    }
    for (week, value) in weeks.iter().zip(values.iter()) {
        table.set(week, value);
    }
    Ok(())
}

pub fn default_unlock_begin(claim_start: u64) -> u64 {
    claim_start.saturating_add(UNLOCK_DELAY_WEEKS * WEEK)
}

pub fn unlock_end(unlock_begin: u64) -> u64 {
    unlock_begin.saturating_add(VESTING_DURATION)
}

/// Basis points locked at `now`.
///
/// Everything is locked before `claim_start`. Nothing is locked once `now`
/// reaches `unlock_begin` (when given) or the table runs out.
pub fn lock_bps(table: &Vec<u32>, claim_start: u64, unlock_begin: Option<u64>, now: u64) -> u32 {
    if now < claim_start {
        return BPS_DENOMINATOR;
    }
    if let Some(begin) = unlock_begin {
        if now >= begin {
            return 0;
        }
    }
    let week = (now - claim_start) / WEEK;
    if week >= LOCK_TABLE_WEEKS as u64 {
        return 0;
    }
    table.get(week as u32).unwrap_or(0)
}

/// Splits `amount` into `(lock, claim)` at `now`.
pub fn split(
    table: &Vec<u32>,
    claim_start: u64,
    unlock_begin: Option<u64>,
    now: u64,
    amount: u128,
) -> (u128, u128) {
    let bps = lock_bps(table, claim_start, unlock_begin, now) as u128;
    let denom = BPS_DENOMINATOR as u128;
    // floor(amount * bps / denom) without the intermediate product
    let lock = (amount / denom) * bps + (amount % denom) * bps / denom;
    (lock, amount - lock)
}
