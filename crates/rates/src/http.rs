//! Billing API rates provider.

use std::time::Duration;

use async_trait::async_trait;
use pricebook_core::currency::{Currency, ExchangeRate};
use pricebook_shared::CurrencyCode;
use pricebook_shared::config::RatesConfig;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::RatesError;
use crate::provider::RatesProvider;
use crate::wire::{CurrenciesResponse, RateResponse, RatesResponse};

const CURRENCIES_PATH: &str = "billing/currencies";
const RATES_PATH: &str = "billing/currencies/rates";

/// Fetches currencies and rates from the billing API.
#[derive(Debug, Clone)]
pub struct HttpRatesProvider {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpRatesProvider {
    /// Creates a provider for `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, RatesError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            token,
        })
    }

    /// Creates a provider from the `rates` configuration section.
    pub fn from_config(config: &RatesConfig) -> Result<Self, RatesError> {
        let base_url = config
            .api_url
            .clone()
            .ok_or_else(|| RatesError::NotConfigured("rates.api_url is missing".to_string()))?;
        Self::new(
            base_url,
            config.token.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RatesError> {
        let url = self.url(path);
        tracing::debug!(url = %url, "Fetching from billing API");

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "Billing API request failed");
            return Err(RatesError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl RatesProvider for HttpRatesProvider {
    async fn fetch_currencies(&self) -> Result<Vec<Currency>, RatesError> {
        let response: CurrenciesResponse = self.get(CURRENCIES_PATH).await?;
        Ok(response.currencies)
    }

    async fn fetch_rates(&self) -> Result<Vec<ExchangeRate>, RatesError> {
        let response: RatesResponse = self.get(RATES_PATH).await?;
        Ok(response.rates.into_iter().map(Into::into).collect())
    }

    async fn fetch_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<ExchangeRate, RatesError> {
        let path = format!("{CURRENCIES_PATH}/{from}/{to}");
        let response: RateResponse = self.get(&path).await?;
        Ok(response.into_rate(from, to))
    }
}
