/// Fixed-point scale for factors, exchange rates and the borrow index.
pub const EXP_SCALE: u128 = 1_000_000_000_000_000_000u128; // 1e18
/// Scale and starting value of every reward index.
pub const REWARD_INITIAL_INDEX: u128 = EXP_SCALE * EXP_SCALE; // 1e36

pub const DEFAULT_CLOSE_FACTOR: u128 = 500_000_000_000_000_000u128; // 0.5
pub const DEFAULT_LIQUIDATION_INCENTIVE: u128 = 1_080_000_000_000_000_000u128; // 1.08
pub const DEFAULT_MAX_ASSETS: u32 = 10;

pub const CLOSE_FACTOR_MIN: u128 = 50_000_000_000_000_000u128; // 0.05
pub const CLOSE_FACTOR_MAX: u128 = 900_000_000_000_000_000u128; // 0.9
pub const COLLATERAL_FACTOR_MAX: u128 = 900_000_000_000_000_000u128; // 0.9
/// Ceiling on the per-second borrow rate reported by a rate model.
pub const MAX_BORROW_RATE_PER_SECOND: u128 = 1_000_000_000_000u128; // ~3150% a year

pub const REWARD_TRACKS: u32 = 2;
/// Track paid through the token lock.
pub const TRACK_LOCKED: u32 = 0;
/// Track paid out in full.
pub const TRACK_DIRECT: u32 = 1;
