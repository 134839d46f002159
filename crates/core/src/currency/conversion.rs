//! Currency conversion logic.
//!
//! CRITICAL: Conversion and rounding are separate steps:
//! - `convert` never rounds; callers round per display context
//! - An unknown or zero rate converts to zero, never to an error
//! - `try_convert` is the strict variant for callers that must know

use pricebook_shared::CurrencyCode;
use rust_decimal::Decimal;

use super::error::CurrencyError;
use super::exchange::{ExchangeRate, resolve_rate};

/// Converts an amount using the given exchange rate.
///
/// Returns zero when the rate is unknown or zero, and when the product
/// does not fit in a `Decimal`.
#[must_use]
pub fn convert(amount: Decimal, rate: Option<Decimal>) -> Decimal {
    match rate {
        Some(rate) if !rate.is_zero() => amount.checked_mul(rate).unwrap_or_else(|| {
            tracing::warn!(%amount, %rate, "Conversion overflowed, using zero");
            Decimal::ZERO
        }),
        _ => Decimal::ZERO,
    }
}

/// Converts an amount from `from` to `to`, failing when no rate resolves.
pub fn try_convert(
    amount: Decimal,
    from: &CurrencyCode,
    to: &CurrencyCode,
    rates: &[ExchangeRate],
    base: &CurrencyCode,
) -> Result<Decimal, CurrencyError> {
    match resolve_rate(from, to, rates, base) {
        Some(rate) if !rate.is_zero() => Ok(amount * rate),
        _ => Err(CurrencyError::RateUnavailable {
            from: from.clone(),
            to: to.clone(),
        }),
    }
}
