//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Rates provider configuration.
    #[serde(default)]
    pub rates: RatesConfig,
    /// Pricing and display configuration.
    #[serde(default)]
    pub pricing: PricingConfig,
}

/// Where currencies and exchange rates are loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatesSource {
    /// Remote billing API.
    Http,
    /// Local JSON snapshot.
    #[default]
    File,
}

/// Rates provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesConfig {
    /// Provider kind.
    #[serde(default)]
    pub source: RatesSource,
    /// Base URL of the billing API (required for `http`).
    pub api_url: Option<String>,
    /// Bearer token sent to the billing API.
    pub token: Option<String>,
    /// Path of the JSON snapshot (used for `file`).
    #[serde(default = "default_snapshot_path")]
    pub path: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            source: RatesSource::default(),
            api_url: None,
            token: None,
            path: default_snapshot_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_snapshot_path() -> String {
    "rates.json".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Pricing and display configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// Overrides the base currency detected from the rate table.
    pub base_currency: Option<String>,
    /// Decimal places used for account display prices.
    #[serde(default = "default_display_precision")]
    pub display_precision: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_currency: None,
            display_precision: default_display_precision(),
        }
    }
}

fn default_display_precision() -> u32 {
    2
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("PRICEBOOK").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Checks cross-field constraints that serde defaults cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AppError::Configuration`] when the HTTP source has no URL.
    pub fn validate(&self) -> crate::AppResult<()> {
        if self.rates.source == RatesSource::Http && self.rates.api_url.is_none() {
            return Err(crate::AppError::Configuration(
                "rates.api_url is required when rates.source = \"http\"".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_sources() {
        temp_env::with_vars_unset(
            [
                "PRICEBOOK__RATES__SOURCE",
                "PRICEBOOK__RATES__API_URL",
                "PRICEBOOK__PRICING__DISPLAY_PRECISION",
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.rates.source, RatesSource::File);
                assert_eq!(config.rates.path, "rates.json");
                assert_eq!(config.rates.timeout_secs, 10);
                assert_eq!(config.pricing.display_precision, 2);
                assert!(config.pricing.base_currency.is_none());
            },
        );
    }

    #[test]
    fn test_environment_overrides() {
        temp_env::with_vars(
            [
                ("PRICEBOOK__RATES__SOURCE", Some("http")),
                ("PRICEBOOK__RATES__API_URL", Some("https://billing.example.com")),
                ("PRICEBOOK__PRICING__BASE_CURRENCY", Some("EUR")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.rates.source, RatesSource::Http);
                assert_eq!(
                    config.rates.api_url.as_deref(),
                    Some("https://billing.example.com")
                );
                assert_eq!(config.pricing.base_currency.as_deref(), Some("EUR"));
                assert!(config.validate().is_ok());
            },
        );
    }

    #[test]
    fn test_http_source_requires_url() {
        let config = AppConfig {
            rates: RatesConfig {
                source: RatesSource::Http,
                ..RatesConfig::default()
            },
            pricing: PricingConfig::default(),
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    }
}
