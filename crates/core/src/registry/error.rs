//! Registry error types.
//!
//! Every rule the registry enforces has its own variant so callers can map
//! rejections to a precise message.

use pricebook_shared::{AppError, CurrencyCode};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while administering currencies and rate edges.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Code or title is blank after trimming.
    #[error("Title and code must be provided")]
    MissingField,

    /// Another currency is already marked default.
    #[error("Default currency already exists")]
    DefaultExists,

    /// Another currency already uses this code.
    #[error("Currency with code {0} already exists")]
    DuplicateCode(CurrencyCode),

    /// The neutral unit cannot become the default currency.
    #[error("Cannot use the neutral unit as default currency")]
    NeutralDefault,

    /// No currency with this id.
    #[error("Currency {0} not found")]
    CurrencyNotFound(i32),

    /// No currency with this code.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(CurrencyCode),

    /// The currency is already the default.
    #[error("Currency {0} is already the default currency")]
    AlreadyDefault(CurrencyCode),

    /// More than one currency is marked default.
    #[error("Registry contains {0} default currencies")]
    MultipleDefaults(usize),

    /// Neither endpoint of a rate edge is the neutral unit.
    #[error("Rate {from} -> {to} must have the neutral unit as one endpoint")]
    RateWithoutNeutral {
        /// Source currency code.
        from: CurrencyCode,
        /// Target currency code.
        to: CurrencyCode,
    },

    /// Rates must be strictly positive.
    #[error("Invalid exchange rate: {0}")]
    InvalidRate(Decimal),

    /// No edge for the pair.
    #[error("No exchange rate from {from} to {to}")]
    RateNotFound {
        /// Source currency code.
        from: CurrencyCode,
        /// Target currency code.
        to: CurrencyCode,
    },
}

impl RegistryError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::MissingField
            | Self::NeutralDefault
            | Self::AlreadyDefault(_)
            | Self::RateWithoutNeutral { .. }
            | Self::InvalidRate(_) => 400,

            Self::CurrencyNotFound(_) | Self::UnknownCurrency(_) | Self::RateNotFound { .. } => 404,

            Self::DefaultExists | Self::DuplicateCode(_) => 409,

            Self::MultipleDefaults(_) => 500,
        }
    }

    /// Returns the machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField => "MISSING_FIELD",
            Self::DefaultExists => "DEFAULT_EXISTS",
            Self::DuplicateCode(_) => "DUPLICATE_CODE",
            Self::NeutralDefault => "NEUTRAL_DEFAULT",
            Self::CurrencyNotFound(_) => "CURRENCY_NOT_FOUND",
            Self::UnknownCurrency(_) => "UNKNOWN_CURRENCY",
            Self::AlreadyDefault(_) => "ALREADY_DEFAULT",
            Self::MultipleDefaults(_) => "MULTIPLE_DEFAULTS",
            Self::RateWithoutNeutral { .. } => "RATE_WITHOUT_NEUTRAL",
            Self::InvalidRate(_) => "INVALID_RATE",
            Self::RateNotFound { .. } => "RATE_NOT_FOUND",
        }
    }
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        match err.status_code() {
            404 => Self::NotFound(err.to_string()),
            409 => Self::Conflict(err.to_string()),
            500 => Self::Internal(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}
