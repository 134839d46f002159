//! Payload shapes shared by the HTTP API and JSON snapshots.
//!
//! Rates arrive loosely typed: numbers, numeric strings or `null`. They are
//! coerced here so a malformed edge becomes a zero rate (which converts to
//! zero) instead of failing the whole payload.

use pricebook_core::currency::{Currency, ExchangeRate};
use pricebook_shared::CurrencyCode;
use pricebook_shared::types::coerce_json_amount;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A rate edge as transmitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireRate {
    /// Source currency code.
    pub from: CurrencyCode,
    /// Target currency code.
    pub to: CurrencyCode,
    /// Rate, any JSON scalar.
    #[serde(default)]
    pub rate: Value,
    /// Commission percent, any JSON scalar.
    #[serde(default)]
    pub commission: Value,
}

impl From<WireRate> for ExchangeRate {
    fn from(wire: WireRate) -> Self {
        Self::new(wire.from, wire.to, coerce_json_amount(&wire.rate))
            .with_commission(coerce_json_amount(&wire.commission))
    }
}

impl From<&ExchangeRate> for WireRate {
    fn from(rate: &ExchangeRate) -> Self {
        Self {
            from: rate.from.clone(),
            to: rate.to.clone(),
            rate: Value::String(rate.rate.to_string()),
            commission: Value::String(rate.commission.to_string()),
        }
    }
}

/// Response of the currency listing.
#[derive(Debug, Deserialize)]
pub struct CurrenciesResponse {
    /// Known currencies.
    #[serde(default)]
    pub currencies: Vec<Currency>,
}

/// Response of the rate listing.
#[derive(Debug, Deserialize)]
pub struct RatesResponse {
    /// Rate edges.
    #[serde(default)]
    pub rates: Vec<WireRate>,
}

/// Response of a single pair lookup.
#[derive(Debug, Deserialize)]
pub struct RateResponse {
    /// Rate, any JSON scalar.
    #[serde(default)]
    pub rate: Value,
    /// Commission percent, any JSON scalar.
    #[serde(default)]
    pub commission: Value,
}

impl RateResponse {
    /// Builds the edge for the pair that was asked for.
    #[must_use]
    pub fn into_rate(self, from: &CurrencyCode, to: &CurrencyCode) -> ExchangeRate {
        ExchangeRate::new(from.clone(), to.clone(), coerce_json_amount(&self.rate))
            .with_commission(coerce_json_amount(&self.commission))
    }
}
