//! Rates provider error types.

use std::path::PathBuf;

use pricebook_shared::{AppError, CurrencyCode};
use thiserror::Error;

/// Errors that can occur when loading currencies and rates.
#[derive(Debug, Error)]
pub enum RatesError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The billing API answered with a non-success status.
    #[error("Rates API returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// Snapshot file could not be read or written.
    #[error("Rates file {}: {source}", path.display())]
    Io {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Payload is not valid JSON of the expected shape.
    #[error("Invalid rates payload: {0}")]
    Parse(#[from] serde_json::Error),

    /// Provider settings are incomplete.
    #[error("Rates provider is not configured: {0}")]
    NotConfigured(String),

    /// Neither the pair nor its reverse has a rate.
    #[error("No exchange rate from {from} to {to}")]
    RateUnavailable {
        /// Source currency code.
        from: CurrencyCode,
        /// Target currency code.
        to: CurrencyCode,
    },
}

impl RatesError {
    /// Returns the machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Http(_) => "RATES_HTTP_ERROR",
            Self::Status { .. } => "RATES_STATUS_ERROR",
            Self::Io { .. } => "RATES_IO_ERROR",
            Self::Parse(_) => "RATES_PARSE_ERROR",
            Self::NotConfigured(_) => "RATES_NOT_CONFIGURED",
            Self::RateUnavailable { .. } => "RATE_UNAVAILABLE",
        }
    }
}

impl From<RatesError> for AppError {
    fn from(err: RatesError) -> Self {
        match err {
            RatesError::Http(_) | RatesError::Status { .. } | RatesError::Io { .. } => {
                Self::ExternalService(err.to_string())
            }
            RatesError::Parse(_) => Self::Validation(err.to_string()),
            RatesError::NotConfigured(_) => Self::Configuration(err.to_string()),
            RatesError::RateUnavailable { .. } => Self::NotFound(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error() {
        let err = RatesError::Status {
            status: 503,
            body: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "Rates API returned 503: maintenance");
        let app: AppError = err.into();
        assert_eq!(app.error_code(), "EXTERNAL_SERVICE_ERROR");
    }

    #[test]
    fn test_io_error_names_path() {
        let err = RatesError::Io {
            path: PathBuf::from("missing.json"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().starts_with("Rates file missing.json"));
        assert_eq!(err.error_code(), "RATES_IO_ERROR");
    }

    #[test]
    fn test_rate_unavailable_is_not_found() {
        let app: AppError = RatesError::RateUnavailable {
            from: CurrencyCode::new("PLN"),
            to: CurrencyCode::new("BYN"),
        }
        .into();
        assert_eq!(app.error_code(), "NOT_FOUND");
    }
}
