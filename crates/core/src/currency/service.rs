//! Currency converter bound to a rate table.
//!
//! This module provides the main service interface for currency operations.
//! A `CurrencyConverter` is an immutable snapshot: the base currency, the
//! rate table and the currency catalogue it was built from. Refreshing rates
//! means building a new converter.

use pricebook_shared::CurrencyCode;
use rust_decimal::Decimal;

use super::conversion::convert;
use super::error::CurrencyError;
use super::exchange::{ExchangeRate, RateLookup, RateTable};
use super::rounding::format_price;
use super::types::{Currency, Rounding};

/// Decimal places of account display prices unless configured otherwise.
pub const DEFAULT_DISPLAY_PRECISION: u32 = 2;

/// Converter for a fixed base currency and rate table.
#[derive(Debug, Clone)]
pub struct CurrencyConverter {
    base: CurrencyCode,
    rates: RateTable,
    currencies: Vec<Currency>,
    display_precision: u32,
}

impl CurrencyConverter {
    /// Creates a converter with no currency catalogue.
    #[must_use]
    pub fn new(base: impl Into<CurrencyCode>, rates: impl Into<RateTable>) -> Self {
        Self {
            base: base.into(),
            rates: rates.into(),
            currencies: Vec::new(),
            display_precision: DEFAULT_DISPLAY_PRECISION,
        }
    }

    /// Builds a converter whose base is detected from the rate table.
    pub fn detect(rates: impl Into<RateTable>) -> Result<Self, CurrencyError> {
        let rates = rates.into();
        let base = rates
            .detect_default()
            .ok_or(CurrencyError::NoDefaultCurrency)?;
        Ok(Self::new(base, rates))
    }

    /// Attaches the currency catalogue used for precision and rounding.
    #[must_use]
    pub fn with_currencies(mut self, currencies: Vec<Currency>) -> Self {
        self.currencies = currencies;
        self
    }

    /// Sets the decimal places of account display prices.
    #[must_use]
    pub fn with_display_precision(mut self, precision: u32) -> Self {
        self.display_precision = precision;
        self
    }

    /// Base (default) currency.
    #[must_use]
    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }

    /// Rate table this converter reads.
    #[must_use]
    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Currency catalogue.
    #[must_use]
    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }

    /// Looks up a currency by code.
    #[must_use]
    pub fn currency(&self, code: &CurrencyCode) -> Option<&Currency> {
        self.currencies.iter().find(|c| &c.code == code)
    }

    /// Rate for `from -> to`, `None` when no edge resolves.
    #[must_use]
    pub fn rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Option<Decimal> {
        self.rates.resolve(from, to, &self.base)
    }

    /// Rate for `from -> to`, falling back to the inverted reverse edge.
    #[must_use]
    pub fn rate_or_inverse(&self, from: &CurrencyCode, to: &CurrencyCode) -> Option<RateLookup> {
        self.rates.resolve_or_inverse(from, to, &self.base)
    }

    /// Rate for `from -> to` with the edge's commission applied.
    #[must_use]
    pub fn quote(&self, from: &CurrencyCode, to: &CurrencyCode) -> Option<Decimal> {
        if from == to {
            return Some(Decimal::ONE);
        }
        self.rates
            .resolve_edge(from, to, &self.base)
            .map(ExchangeRate::rate_with_commission)
    }

    /// Converts without rounding; zero when the rate is unknown.
    #[must_use]
    pub fn convert_between(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Decimal {
        convert(amount, self.rate(from, to))
    }

    /// Converts a base-currency price into the account's currency for display.
    ///
    /// Uses the `base -> account` edge; zero when it is missing.
    #[must_use]
    pub fn to_account_price(&self, price: Decimal, account: &CurrencyCode) -> Decimal {
        let converted = convert(price, self.rate(&self.base, account));
        self.display(converted)
    }

    /// Converts an account-currency price back into the base currency for display.
    ///
    /// Divides by the `account -> base` edge; zero when it is missing.
    #[must_use]
    pub fn from_account_price(&self, price: Decimal, account: &CurrencyCode) -> Decimal {
        let inverse = self
            .rate(account, &self.base)
            .filter(|rate| !rate.is_zero())
            .map(|rate| Decimal::ONE / rate);
        self.display(convert(price, inverse))
    }

    /// Converts many amounts with the target currency's precision and rounding.
    ///
    /// Same-currency requests return the amounts untouched. An unknown target
    /// rounds with precision 0, half away from zero.
    pub fn convert_many(
        &self,
        amounts: &[Decimal],
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<Vec<Decimal>, CurrencyError> {
        if from == to {
            return Ok(amounts.to_vec());
        }

        let rate = self
            .rate(from, to)
            .filter(|rate| !rate.is_zero())
            .ok_or_else(|| CurrencyError::RateUnavailable {
                from: from.clone(),
                to: to.clone(),
            })?;

        let (precision, rounding) = self
            .currency(to)
            .map_or((0, Rounding::default()), |c| (c.precision, c.rounding));

        Ok(amounts
            .iter()
            .map(|amount| format_price(convert(*amount, Some(rate)), precision, rounding))
            .collect())
    }

    /// Rounds for account display.
    fn display(&self, amount: Decimal) -> Decimal {
        format_price(amount, self.display_precision, Rounding::RoundHalf)
    }
}
