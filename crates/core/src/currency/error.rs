//! Currency error types.
//!
//! Only callers that opt into strict handling see these. Display paths
//! degrade to zero instead.

use pricebook_shared::{AppError, CurrencyCode};
use thiserror::Error;

/// Errors raised by strict conversion paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    /// No usable edge for the currency pair.
    #[error("No exchange rate from {from} to {to}")]
    RateUnavailable {
        /// Source currency code.
        from: CurrencyCode,
        /// Target currency code.
        to: CurrencyCode,
    },

    /// Currency is not in the catalogue.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(CurrencyCode),

    /// No base currency is configured or detectable.
    #[error("No default currency is configured")]
    NoDefaultCurrency,
}

impl CurrencyError {
    /// Returns the machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::RateUnavailable { .. } => "RATE_UNAVAILABLE",
            Self::UnknownCurrency(_) => "UNKNOWN_CURRENCY",
            Self::NoDefaultCurrency => "NO_DEFAULT_CURRENCY",
        }
    }
}

impl From<CurrencyError> for AppError {
    fn from(err: CurrencyError) -> Self {
        match err {
            CurrencyError::RateUnavailable { .. } | CurrencyError::UnknownCurrency(_) => {
                Self::NotFound(err.to_string())
            }
            CurrencyError::NoDefaultCurrency => Self::Configuration(err.to_string()),
        }
    }
}
