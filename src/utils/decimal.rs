//! Decimal arithmetic utilities for financial calculations.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// Round a decimal to a specific number of decimal places.
pub fn round_to_precision(value: Decimal, decimals: u32) -> Decimal {
    value.round_dp(decimals)
}

/// Truncate a fractional share quantity toward zero.
///
/// Fractional shares are not tradable, so every sized leg goes through here.
/// Negative quantities collapse to zero; `None` when the count exceeds `u64`.
pub fn whole_shares(quantity: Decimal) -> Option<u64> {
    if quantity <= Decimal::ZERO {
        return Some(0);
    }
    quantity.trunc().to_u64()
}

/// Absolute difference between two values.
pub fn abs_diff(a: Decimal, b: Decimal) -> Decimal {
    (a - b).abs()
}

/// Convert a float quote from a market data feed into a `Decimal`.
///
/// Returns `None` for NaN and infinities.
pub fn from_quote(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value).map(|d| d.normalize())
}
