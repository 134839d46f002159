//! Lenient amount parsing.
//!
//! Prices reach the pricing engine from forms, query strings and loosely
//! typed JSON. Anything that does not parse as a number becomes zero,
//! which the dashboard renders as an unconvertible price.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

/// Parses a decimal amount, returning zero for blank or non-numeric input.
///
/// Accepts plain (`"12.5"`) and scientific (`"1e-3"`) notation.
#[must_use]
pub fn coerce_amount(raw: &str) -> Decimal {
    let raw = raw.trim();
    if raw.is_empty() {
        return Decimal::ZERO;
    }

    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .unwrap_or_else(|_| {
            tracing::debug!(input = raw, "Non-numeric amount coerced to zero");
            Decimal::ZERO
        })
}

/// Coerces a JSON value into an amount.
///
/// Numbers and numeric strings are parsed, booleans map to 0/1 and
/// everything else (null, arrays, objects) becomes zero.
#[must_use]
pub fn coerce_json_amount(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => coerce_amount(&n.to_string()),
        Value::String(s) => coerce_amount(s),
        Value::Bool(true) => Decimal::ONE,
        Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => Decimal::ZERO,
    }
}
