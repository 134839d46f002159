//! Currency records and rounding policies.

use pricebook_shared::CurrencyCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::rounding::format_price;

/// How a currency rounds prices to its precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rounding {
    /// Round half away from zero.
    #[default]
    RoundHalf,
    /// Round toward negative infinity (floor).
    RoundDown,
    /// Round toward positive infinity (ceil).
    RoundUp,
}

/// A currency known to the billing platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// Numeric id assigned by the registry. `0` is the neutral unit.
    #[serde(default)]
    pub id: i32,
    /// Canonical identifier.
    pub code: CurrencyCode,
    /// Human-readable name.
    #[serde(default)]
    pub title: String,
    /// Decimal places used when rounding prices.
    #[serde(default)]
    pub precision: u32,
    /// Rounding policy applied at `precision`.
    #[serde(default)]
    pub rounding: Rounding,
    /// Visible to non-admin accounts.
    #[serde(default)]
    pub public: bool,
    /// Marks the platform's default (base) currency.
    #[serde(default)]
    pub default: bool,
}

impl Currency {
    /// Id reserved for the neutral conversion unit.
    pub const NEUTRAL_ID: i32 = 0;

    /// Creates a public currency with default precision and rounding.
    #[must_use]
    pub fn new(id: i32, code: impl Into<CurrencyCode>, title: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
            title: title.into(),
            precision: 0,
            rounding: Rounding::default(),
            public: true,
            default: false,
        }
    }

    /// The neutral conversion unit every platform currency is priced against.
    #[must_use]
    pub fn neutral() -> Self {
        Self::new(Self::NEUTRAL_ID, CurrencyCode::neutral(), CurrencyCode::NEUTRAL)
    }

    /// Sets the precision.
    #[must_use]
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    /// Sets the rounding policy.
    #[must_use]
    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    /// Returns true for the neutral conversion unit.
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        self.code.is_neutral()
    }

    /// Rounds an amount with this currency's precision and policy.
    #[must_use]
    pub fn round(&self, amount: Decimal) -> Decimal {
        format_price(amount, self.precision, self.rounding)
    }
}
