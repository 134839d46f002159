//! Currency-aware price rounding.
//!
//! CRITICAL: Rounding rules for displayed prices:
//! - Sub-cent magnitudes keep 10 decimal places so they never render as 0.00
//! - Zero is always returned as a plain `0`
//! - Half rounding is half away from zero and keeps trailing zeros

use rust_decimal::{Decimal, RoundingStrategy};

use super::types::Rounding;

/// Decimal places kept for very small amounts.
pub const SMALL_AMOUNT_PRECISION: u32 = 10;

/// Largest scale a `Decimal` can carry.
const MAX_SCALE: u32 = 28;

/// Upper bound (exclusive) of the positive sub-cent range.
const SUB_CENT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Returns true for amounts that would vanish at display precision.
///
/// Covers `0 < amount < 0.01` and `-1 < amount < 0`. The negative window is
/// wider than the positive one; that asymmetry is long-standing dashboard
/// behavior.
fn is_small_magnitude(amount: Decimal) -> bool {
    (amount > Decimal::ZERO && amount < SUB_CENT)
        || (amount > Decimal::NEGATIVE_ONE && amount < Decimal::ZERO)
}

/// Returns `0` for any zero-valued decimal, dropping sign and scale.
fn canonical(value: Decimal) -> Decimal {
    if value.is_zero() { Decimal::ZERO } else { value }
}

/// Rounds a price to `precision` decimal places using `rounding`.
///
/// Very small magnitudes bypass `precision` and are rounded to
/// [`SMALL_AMOUNT_PRECISION`] places instead. `RoundHalf` results carry
/// exactly `precision` decimal places (`180` at precision 2 is `180.00`).
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use pricebook_core::currency::{Rounding, format_price};
///
/// assert_eq!(format_price(dec!(12.345), 2, Rounding::RoundHalf), dec!(12.35));
/// assert_eq!(format_price(dec!(12.345), 2, Rounding::RoundDown), dec!(12.34));
/// assert_eq!(format_price(dec!(0.0051234), 2, Rounding::RoundHalf), dec!(0.0051234));
/// ```
#[must_use]
pub fn format_price(amount: Decimal, precision: u32, rounding: Rounding) -> Decimal {
    if is_small_magnitude(amount) {
        let rounded = amount
            .round_dp_with_strategy(SMALL_AMOUNT_PRECISION, RoundingStrategy::MidpointAwayFromZero)
            .normalize();
        // 0.00999999999996 rounds to 0.01, which is no longer small.
        if rounded.is_zero() || is_small_magnitude(rounded) {
            return canonical(rounded);
        }
    }

    if amount.is_zero() {
        return Decimal::ZERO;
    }

    let precision = precision.min(MAX_SCALE);
    let rounded = match rounding {
        Rounding::RoundHalf => {
            let mut fixed =
                amount.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
            fixed.rescale(precision);
            fixed
        }
        Rounding::RoundDown => {
            amount.round_dp_with_strategy(precision, RoundingStrategy::ToNegativeInfinity)
        }
        Rounding::RoundUp => {
            amount.round_dp_with_strategy(precision, RoundingStrategy::ToPositiveInfinity)
        }
    };

    canonical(rounded)
}

/// Renders an amount with exactly `precision` decimal places, half away from zero.
#[must_use]
pub fn to_fixed(amount: Decimal, precision: u32) -> String {
    let precision = precision.min(MAX_SCALE);
    let mut fixed = amount.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    fixed.rescale(precision);
    canonical_fixed(fixed, precision)
}

fn canonical_fixed(value: Decimal, precision: u32) -> String {
    if value.is_zero() {
        let mut zero = Decimal::ZERO;
        zero.rescale(precision);
        return zero.to_string();
    }
    value.to_string()
}
