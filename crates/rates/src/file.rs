//! JSON snapshot rates provider.
//!
//! A snapshot is a single document `{ "currencies": [...], "rates": [...] }`.
//! It is re-read on every fetch so edits show up on the next refresh.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pricebook_core::currency::{Currency, ExchangeRate};
use pricebook_core::registry::CurrencyRegistry;
use pricebook_shared::CurrencyCode;
use serde::{Deserialize, Serialize};

use crate::error::RatesError;
use crate::provider::RatesProvider;
use crate::wire::WireRate;

/// Currencies and rates stored together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Currency catalogue.
    #[serde(default)]
    pub currencies: Vec<Currency>,
    /// Rate edges.
    #[serde(default)]
    pub rates: Vec<WireRate>,
}

impl Snapshot {
    /// Captures a registry's state.
    #[must_use]
    pub fn from_registry(registry: &CurrencyRegistry) -> Self {
        Self {
            currencies: registry.currencies().to_vec(),
            rates: registry.rates().as_slice().iter().map(WireRate::from).collect(),
        }
    }

    /// Rate edges with coerced amounts.
    #[must_use]
    pub fn exchange_rates(&self) -> Vec<ExchangeRate> {
        self.rates.iter().cloned().map(Into::into).collect()
    }

    /// Restores a registry from this snapshot.
    #[must_use]
    pub fn into_registry(self) -> CurrencyRegistry {
        let rates = self.exchange_rates();
        CurrencyRegistry::from_parts(self.currencies, rates)
    }
}

/// Reads currencies and rates from a JSON file.
#[derive(Debug, Clone)]
pub struct FileRatesProvider {
    path: PathBuf,
}

impl FileRatesProvider {
    /// Creates a provider for the snapshot at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Snapshot location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the snapshot.
    pub async fn load(&self) -> Result<Snapshot, RatesError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| self.io_error(source))?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Writes the snapshot, replacing the file.
    pub async fn save(&self, snapshot: &Snapshot) -> Result<(), RatesError> {
        let raw = serde_json::to_string_pretty(snapshot)?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|source| self.io_error(source))?;
        tracing::info!(path = %self.path.display(), "Rates snapshot saved");
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> RatesError {
        RatesError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl RatesProvider for FileRatesProvider {
    async fn fetch_currencies(&self) -> Result<Vec<Currency>, RatesError> {
        Ok(self.load().await?.currencies)
    }

    async fn fetch_rates(&self) -> Result<Vec<ExchangeRate>, RatesError> {
        Ok(self.load().await?.exchange_rates())
    }

    async fn fetch_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<ExchangeRate, RatesError> {
        self.fetch_rates()
            .await?
            .into_iter()
            .find(|r| &r.from == from && &r.to == to)
            .ok_or_else(|| RatesError::RateUnavailable {
                from: from.clone(),
                to: to.clone(),
            })
    }
}
