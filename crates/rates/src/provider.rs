//! Rates provider abstraction.

use std::sync::Arc;

use async_trait::async_trait;
use pricebook_core::currency::{Currency, ExchangeRate};
use pricebook_shared::CurrencyCode;
use pricebook_shared::config::{RatesConfig, RatesSource};

use crate::error::RatesError;
use crate::file::FileRatesProvider;
use crate::http::HttpRatesProvider;

/// Source of currencies and exchange rates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatesProvider: Send + Sync {
    /// Fetches the currency catalogue.
    async fn fetch_currencies(&self) -> Result<Vec<Currency>, RatesError>;

    /// Fetches every rate edge.
    async fn fetch_rates(&self) -> Result<Vec<ExchangeRate>, RatesError>;

    /// Fetches the `from -> to` edge.
    async fn fetch_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<ExchangeRate, RatesError>;
}

/// Builds the provider selected by configuration.
pub fn provider_from_config(config: &RatesConfig) -> Result<Arc<dyn RatesProvider>, RatesError> {
    match config.source {
        RatesSource::Http => Ok(Arc::new(HttpRatesProvider::from_config(config)?)),
        RatesSource::File => Ok(Arc::new(FileRatesProvider::new(&config.path))),
    }
}
