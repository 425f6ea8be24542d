use soroban_sdk::{Env, U256};

use crate::errors::Error;

/// `floor(a * b / d)` with a 256-bit intermediate when `a * b` overflows.
pub fn mul_div(env: &Env, a: u128, b: u128, d: u128) -> Result<u128, Error> {
    if d == 0 {
        return Err(Error::MathOverflow);
    }
    if let Some(product) = a.checked_mul(b) {
        return Ok(product / d);
    }
    let wide = U256::from_u128(env, a)
        .mul(&U256::from_u128(env, b))
        .div(&U256::from_u128(env, d));
    wide.to_u128().ok_or(Error::MathOverflow)
}

/// `ceil(a * b / d)`.
pub fn mul_div_up(env: &Env, a: u128, b: u128, d: u128) -> Result<u128, Error> {
    let down = mul_div(env, a, b, d)?;
    let exact = match a.checked_mul(b) {
        Some(product) => product % d == 0,
        None => {
            let product = U256::from_u128(env, a).mul(&U256::from_u128(env, b));
            product.rem_euclid(&U256::from_u128(env, d)) == U256::from_u32(env, 0)
        }
    };
    if exact {
        Ok(down)
    } else {
        down.checked_add(1).ok_or(Error::MathOverflow)
    }
}

pub fn add(a: u128, b: u128) -> Result<u128, Error> {
    a.checked_add(b).ok_or(Error::MathOverflow)
}

pub fn sub(a: u128, b: u128) -> Result<u128, Error> {
    a.checked_sub(b).ok_or(Error::MathOverflow)
}

pub fn to_i128(amount: u128) -> Result<i128, Error> {
    i128::try_from(amount).map_err(|_| Error::MathOverflow)
}
