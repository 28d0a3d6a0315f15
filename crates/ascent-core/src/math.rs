//! Integer math for curve and pool accounting.
//!
//! Curve integrals and reserve products exceed u128 long before any single
//! amount does, so intermediates are carried in a 256-bit integer and
//! narrowed back once, with an explicit rounding direction.

use crate::error::LaunchError;
use crate::BPS_DENOMINATOR;
use uint::construct_uint;

construct_uint! {
    /// Fixed-width 256-bit integer for intermediate products.
    pub struct U256(4);
}

/// Direction of the single rounding step applied to a rational result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Toward zero. Used for anything the protocol pays out.
    Down,
    /// Away from zero. Used for anything the protocol receives.
    Up,
}

pub fn widen(v: u128) -> U256 {
    U256::from(v)
}

/// Narrow a 256-bit value back to u128, failing if the high half is set.
pub fn narrow(v: U256) -> Result<u128, LaunchError> {
    if v.bits() > 128 {
        return Err(LaunchError::ArithmeticOverflow);
    }
    Ok(v.low_u128())
}

pub fn checked_mul(a: U256, b: U256) -> Result<U256, LaunchError> {
    a.checked_mul(b).ok_or(LaunchError::ArithmeticOverflow)
}

pub fn checked_add(a: U256, b: U256) -> Result<U256, LaunchError> {
    a.checked_add(b).ok_or(LaunchError::ArithmeticOverflow)
}

/// `num / den` rounded in the requested direction.
pub fn div_round(num: U256, den: U256, rounding: Rounding) -> Result<U256, LaunchError> {
    if den.is_zero() {
        return Err(LaunchError::ArithmeticOverflow);
    }
    let q = num / den;
    match rounding {
        Rounding::Down => Ok(q),
        Rounding::Up => {
            if (num % den).is_zero() {
                Ok(q)
            } else {
                checked_add(q, U256::one())
            }
        }
    }
}

/// `a * b / d` with a 256-bit intermediate.
pub fn mul_div(a: u128, b: u128, d: u128, rounding: Rounding) -> Result<u128, LaunchError> {
    let prod = checked_mul(widen(a), widen(b))?;
    narrow(div_round(prod, widen(d), rounding)?)
}

/// Integer square root (floor) via Newton's method.
pub fn isqrt(n: u128) -> u128 {
    if n == 0 {
        return 0;
    }
    let mut x = n;
    let mut y = x.div_ceil(2);
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

/// `floor(sqrt(a * b))` without overflowing u128 on the product.
pub fn isqrt_product(a: u128, b: u128) -> Result<u128, LaunchError> {
    let prod = checked_mul(widen(a), widen(b))?;
    // sqrt of a 256-bit value always fits in 128 bits
    narrow(prod.integer_sqrt())
}

/// Split a fee off `amount`. Returns `(after_fee, fee)`; the fee rounds down.
pub fn deduct_fee(amount: u128, fee_bps: u128) -> Result<(u128, u128), LaunchError> {
    let fee = bps_of(amount, fee_bps)?;
    Ok((amount - fee, fee))
}

/// `amount * bps / 10_000`, rounded down.
pub fn bps_of(amount: u128, bps: u128) -> Result<u128, LaunchError> {
    mul_div(amount, bps, BPS_DENOMINATOR, Rounding::Down)
}
