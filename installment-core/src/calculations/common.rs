//! Common utility functions for financing calculations.
//!
//! This module provides shared arithmetic used by every financing mode,
//! including rounding, clamping and the guarded per-month division.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to `dp` decimal places using half-up rounding.
///
/// Currencies without minor units are displayed with `dp = 0`.
///
/// ```
/// use rust_decimal_macros::dec;
/// use installment_core::calculations::common::round_half_up_dp;
///
/// assert_eq!(round_half_up_dp(dec!(1562499.5), 0), dec!(1562500));
/// assert_eq!(round_half_up_dp(dec!(1562499.4), 0), dec!(1562499));
/// ```
pub fn round_half_up_dp(
    value: Decimal,
    dp: u32,
) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// ```
/// use rust_decimal_macros::dec;
/// use installment_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Returns the minimum of two decimal values.
pub fn min(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a < b { a } else { b }
}

/// Clamps `value` into `[lower, upper]`.
///
/// The lower bound wins when the bounds are inverted, so a negative price
/// can never produce a negative result.
pub fn clamp(
    value: Decimal,
    lower: Decimal,
    upper: Decimal,
) -> Decimal {
    max(min(value, upper), lower)
}

/// Replaces negative values with zero.
pub fn non_negative(value: Decimal) -> Decimal {
    max(value, Decimal::ZERO)
}

/// Converts a markup percentage into a multiplier (55 becomes 1.55).
pub fn markup_factor(rate_pct: Decimal) -> Decimal {
    Decimal::ONE + rate_pct / Decimal::ONE_HUNDRED
}

/// Divides `total` evenly over `term` months.
///
/// A term of zero means "no term selected" and yields zero rather than an
/// error.
pub fn per_month(
    total: Decimal,
    term: u32,
) -> Decimal {
    if term == 0 {
        return Decimal::ZERO;
    }
    total
        .checked_div(Decimal::from(term))
        .unwrap_or(Decimal::ZERO)
}
