//! Currency store.
//!
//! Keeps the latest currencies and rates from a provider and hands out
//! immutable [`CurrencyConverter`] snapshots. Readers never wait for the
//! provider; a refresh only holds locks while swapping data in.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pricebook_core::currency::{
    Currency, CurrencyConverter, CurrencyError, ExchangeRate, RateLookup, RateLookupMethod,
    RateTable,
};
use pricebook_core::currency::service::DEFAULT_DISPLAY_PRECISION;
use pricebook_shared::CurrencyCode;
use pricebook_shared::config::PricingConfig;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::error::RatesError;
use crate::provider::RatesProvider;
use crate::resource::{FetchOutcome, Resource};

/// Currencies, rates and the detected default currency.
pub struct CurrencyStore {
    provider: Arc<dyn RatesProvider>,
    currencies: Resource<Currency>,
    rates: Resource<ExchangeRate>,
    pair: Resource<ExchangeRate>,
    default: RwLock<Option<CurrencyCode>>,
    refreshed_at: RwLock<Option<DateTime<Utc>>>,
    base_override: Option<CurrencyCode>,
    display_precision: u32,
}

impl CurrencyStore {
    /// Creates an empty store backed by `provider`.
    pub fn new(provider: Arc<dyn RatesProvider>) -> Self {
        Self {
            provider,
            currencies: Resource::new(),
            rates: Resource::new(),
            pair: Resource::new(),
            default: RwLock::new(None),
            refreshed_at: RwLock::new(None),
            base_override: None,
            display_precision: DEFAULT_DISPLAY_PRECISION,
        }
    }

    /// Applies the `pricing` configuration section.
    #[must_use]
    pub fn with_pricing(mut self, pricing: &PricingConfig) -> Self {
        self.base_override = pricing
            .base_currency
            .as_deref()
            .map(CurrencyCode::new)
            .filter(|code| !code.is_empty());
        self.display_precision = pricing.display_precision;
        self
    }

    /// Reloads currencies, then rates, then the default currency.
    ///
    /// A non-silent refresh clears everything first. Returns
    /// [`FetchOutcome::Skipped`] when a refresh is already running; the
    /// default currency and refresh time are then left alone.
    pub async fn refresh(&self, silent: bool) -> Result<FetchOutcome, RatesError> {
        let fetched = self
            .currencies
            .fetch(silent, || self.provider.fetch_currencies())
            .await;
        if matches!(fetched, Ok(FetchOutcome::Skipped)) {
            tracing::debug!("Currency refresh already in flight");
            return Ok(FetchOutcome::Skipped);
        }
        if !silent {
            *self.default.write().await = None;
        }
        fetched?;

        let outcome = self.rates.fetch(silent, || self.provider.fetch_rates()).await?;
        if outcome == FetchOutcome::Skipped {
            tracing::debug!("Rates refresh already in flight");
            return Ok(outcome);
        }
        let rates = RateTable::new(self.rates.list().await);

        let default = match &self.base_override {
            Some(code) => Some(code.clone()),
            None => rates.detect_default(),
        };
        if default.is_none() {
            tracing::warn!(edges = rates.len(), "No default currency in rate table");
        }

        tracing::info!(
            currencies = self.currencies.len().await,
            rates = rates.len(),
            default = default.as_ref().map_or("-", CurrencyCode::as_str),
            "Currency store refreshed"
        );
        *self.default.write().await = default;
        *self.refreshed_at.write().await = Some(Utc::now());
        Ok(outcome)
    }

    /// The default currency detected by the last refresh.
    pub async fn default_currency(&self) -> Option<CurrencyCode> {
        self.default.read().await.clone()
    }

    /// When the last refresh finished.
    pub async fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        *self.refreshed_at.read().await
    }

    /// Copy of the currency catalogue.
    pub async fn currencies(&self) -> Vec<Currency> {
        self.currencies.list().await
    }

    /// Copy of the rate table.
    pub async fn rates(&self) -> RateTable {
        RateTable::new(self.rates.list().await)
    }

    /// Returns true while a refresh is running.
    pub async fn is_loading(&self) -> bool {
        self.currencies.is_loading().await || self.rates.is_loading().await
    }

    /// Builds a converter over the current data.
    pub async fn converter(&self) -> Result<CurrencyConverter, CurrencyError> {
        let base = self
            .default_currency()
            .await
            .ok_or(CurrencyError::NoDefaultCurrency)?;

        Ok(CurrencyConverter::new(base, self.rates().await)
            .with_currencies(self.currencies().await)
            .with_display_precision(self.display_precision))
    }

    /// Asks the provider for a single pair.
    ///
    /// Falls back to the inverted reverse pair when the direct one is
    /// missing or zero. The provider's edge is kept as the selected pair,
    /// apart from the rate table, so lookups never hold up a refresh.
    pub async fn pair_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<RateLookup, RatesError> {
        if from == to {
            return Ok(RateLookup {
                rate: Decimal::ONE,
                method: RateLookupMethod::Identity,
            });
        }

        let provider = &self.provider;
        let edge = self
            .pair
            .fetch_one(|| async move {
                match provider.fetch_rate(from, to).await {
                    Ok(edge) if !edge.rate.is_zero() => return Ok(edge),
                    Ok(_) => tracing::debug!(%from, %to, "Zero rate, trying reverse pair"),
                    Err(err) => tracing::debug!(%from, %to, error = %err, "Trying reverse pair"),
                }

                provider
                    .fetch_rate(to, from)
                    .await
                    .ok()
                    .filter(|reverse| !reverse.rate.is_zero())
                    .ok_or_else(|| RatesError::RateUnavailable {
                        from: from.clone(),
                        to: to.clone(),
                    })
            })
            .await?;

        if &edge.from == from {
            return Ok(RateLookup {
                rate: edge.rate,
                method: RateLookupMethod::Direct,
            });
        }
        Ok(RateLookup {
            rate: Decimal::ONE / edge.rate,
            method: RateLookupMethod::Inverse,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockRatesProvider;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use tokio::sync::{Mutex, oneshot};

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::new(s)
    }

    fn catalogue() -> Vec<Currency> {
        vec![
            Currency::neutral(),
            Currency::new(1, "USD", "Dollar").with_precision(2),
            Currency::new(2, "EUR", "Euro").with_precision(2),
        ]
    }

    fn edges() -> Vec<ExchangeRate> {
        vec![
            ExchangeRate::new("NCU", "USD", dec!(1)),
            ExchangeRate::new("USD", "NCU", dec!(1)),
            ExchangeRate::new("NCU", "EUR", dec!(0.9)),
        ]
    }

    fn loaded_provider() -> MockRatesProvider {
        let mut provider = MockRatesProvider::new();
        provider
            .expect_fetch_currencies()
            .returning(|| Ok(catalogue()));
        provider.expect_fetch_rates().returning(|| Ok(edges()));
        provider
    }

    #[tokio::test]
    async fn test_refresh_detects_default() {
        let store = CurrencyStore::new(Arc::new(loaded_provider()));
        assert!(store.converter().await.is_err());

        let outcome = store.refresh(false).await.unwrap();
        assert_eq!(outcome, FetchOutcome::Loaded(3));
        assert_eq!(store.default_currency().await, Some(code("USD")));
        assert_eq!(store.currencies().await.len(), 3);
        assert!(store.refreshed_at().await.is_some());
        assert!(!store.is_loading().await);

        let converter = store.converter().await.unwrap();
        assert_eq!(
            converter.to_account_price(dec!(10), &code("EUR")),
            dec!(9.00)
        );
    }

    #[tokio::test]
    async fn test_base_override_wins() {
        let pricing = PricingConfig {
            base_currency: Some("EUR".to_string()),
            display_precision: 3,
        };
        let store = CurrencyStore::new(Arc::new(loaded_provider())).with_pricing(&pricing);
        store.refresh(true).await.unwrap();
        assert_eq!(store.default_currency().await, Some(code("EUR")));
    }

    #[tokio::test]
    async fn test_refresh_error_propagates() {
        let mut provider = MockRatesProvider::new();
        provider
            .expect_fetch_currencies()
            .returning(|| Ok(catalogue()));
        provider.expect_fetch_rates().returning(|| {
            Err(RatesError::Status {
                status: 502,
                body: String::new(),
            })
        });

        let store = CurrencyStore::new(Arc::new(provider));
        let err = store.refresh(false).await.unwrap_err();
        assert_eq!(err.error_code(), "RATES_STATUS_ERROR");
        assert!(!store.is_loading().await);
        assert_eq!(store.default_currency().await, None);
    }

    #[tokio::test]
    async fn test_pair_rate_direct() {
        let mut provider = MockRatesProvider::new();
        provider
            .expect_fetch_rate()
            .withf(|from, to| from == "NCU" && to == "EUR")
            .times(1)
            .returning(|from, to| Ok(ExchangeRate::new(from.clone(), to.clone(), dec!(0.9))));

        let store = CurrencyStore::new(Arc::new(provider));
        let lookup = store.pair_rate(&code("NCU"), &code("EUR")).await.unwrap();
        assert_eq!(lookup.method, RateLookupMethod::Direct);
        assert_eq!(lookup.rate, dec!(0.9));
    }

    #[tokio::test]
    async fn test_pair_rate_falls_back_to_reverse() {
        let mut provider = MockRatesProvider::new();
        provider
            .expect_fetch_rate()
            .withf(|from, to| from == "EUR" && to == "NCU")
            .returning(|from, to| {
                Err(RatesError::RateUnavailable {
                    from: from.clone(),
                    to: to.clone(),
                })
            });
        provider
            .expect_fetch_rate()
            .withf(|from, to| from == "NCU" && to == "EUR")
            .returning(|from, to| Ok(ExchangeRate::new(from.clone(), to.clone(), dec!(0.8))));

        let store = CurrencyStore::new(Arc::new(provider));
        let lookup = store.pair_rate(&code("EUR"), &code("NCU")).await.unwrap();
        assert_eq!(lookup.method, RateLookupMethod::Inverse);
        assert_eq!(lookup.rate, dec!(1.25));
    }

    #[tokio::test]
    async fn test_pair_rate_unavailable() {
        let mut provider = MockRatesProvider::new();
        provider
            .expect_fetch_rate()
            .returning(|from, to| Ok(ExchangeRate::new(from.clone(), to.clone(), Decimal::ZERO)));

        let store = CurrencyStore::new(Arc::new(provider));
        let err = store.pair_rate(&code("EUR"), &code("PLN")).await.unwrap_err();
        assert_eq!(err.error_code(), "RATE_UNAVAILABLE");
    }

    /// Provider whose `fetch_rate` blocks until released.
    struct HeldPairProvider {
        started: Mutex<Option<oneshot::Sender<()>>>,
        release: Mutex<Option<oneshot::Receiver<()>>>,
    }

    #[async_trait]
    impl RatesProvider for HeldPairProvider {
        async fn fetch_currencies(&self) -> Result<Vec<Currency>, RatesError> {
            Ok(catalogue())
        }

        async fn fetch_rates(&self) -> Result<Vec<ExchangeRate>, RatesError> {
            Ok(edges())
        }

        async fn fetch_rate(
            &self,
            from: &CurrencyCode,
            to: &CurrencyCode,
        ) -> Result<ExchangeRate, RatesError> {
            let started = self.started.lock().await.take();
            let release = self.release.lock().await.take();
            if let Some(started) = started {
                let _ = started.send(());
            }
            if let Some(release) = release {
                let _ = release.await;
            }
            Ok(ExchangeRate::new(from.clone(), to.clone(), dec!(0.9)))
        }
    }

    #[tokio::test]
    async fn test_refresh_during_pair_lookup_loads_rates() {
        let (started_tx, started) = oneshot::channel();
        let (release, release_rx) = oneshot::channel();
        let store = Arc::new(CurrencyStore::new(Arc::new(HeldPairProvider {
            started: Mutex::new(Some(started_tx)),
            release: Mutex::new(Some(release_rx)),
        })));

        let lookup = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.pair_rate(&code("NCU"), &code("EUR")).await })
        };
        started.await.unwrap();

        let outcome = store.refresh(false).await.unwrap();
        assert_eq!(outcome, FetchOutcome::Loaded(3));
        assert_eq!(store.rates().await.len(), 3);
        assert_eq!(store.default_currency().await, Some(code("USD")));
        assert!(store.converter().await.is_ok());

        release.send(()).unwrap();
        let pair = lookup.await.unwrap().unwrap();
        assert_eq!(pair.method, RateLookupMethod::Direct);
        assert_eq!(store.rates().await.len(), 3);
        assert!(!store.is_loading().await);
    }

    #[tokio::test]
    async fn test_skipped_refresh_keeps_default() {
        let store = Arc::new(CurrencyStore::new(Arc::new(loaded_provider())));
        store.refresh(false).await.unwrap();
        let refreshed_at = store.refreshed_at().await;

        let (started_tx, started) = oneshot::channel::<()>();
        let (release, wait) = oneshot::channel::<()>();
        let in_flight = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .currencies
                    .fetch(true, || async move {
                        started_tx.send(()).unwrap();
                        wait.await.unwrap();
                        Ok::<_, RatesError>(catalogue())
                    })
                    .await
            })
        };
        started.await.unwrap();

        let outcome = store.refresh(false).await.unwrap();
        assert_eq!(outcome, FetchOutcome::Skipped);
        assert_eq!(store.default_currency().await, Some(code("USD")));
        assert_eq!(store.refreshed_at().await, refreshed_at);

        release.send(()).unwrap();
        in_flight.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_pair_rate_identity_skips_provider() {
        let store = CurrencyStore::new(Arc::new(MockRatesProvider::new()));
        let lookup = store.pair_rate(&code("EUR"), &code("EUR")).await.unwrap();
        assert_eq!(lookup.method, RateLookupMethod::Identity);
    }
}
