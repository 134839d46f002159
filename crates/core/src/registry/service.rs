//! In-memory currency registry.
//!
//! Holds the currency catalogue and the rate table and enforces the rules
//! for changing them:
//!
//! - codes and titles are trimmed and required
//! - at most one currency is the default
//! - every rate edge has the neutral unit on one side and is mirrored by
//!   its reverse edge

use pricebook_shared::CurrencyCode;
use rust_decimal::Decimal;

use crate::currency::{Currency, CurrencyConverter, CurrencyError, ExchangeRate, RateTable};
use crate::registry::error::RegistryError;

/// Precision given to new currencies that do not set one.
pub const DEFAULT_PRECISION: u32 = 2;

/// Currencies and rate edges of one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyRegistry {
    currencies: Vec<Currency>,
    rates: RateTable,
}

impl Default for CurrencyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CurrencyRegistry {
    /// Creates a registry holding only the neutral unit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            currencies: vec![Currency::neutral()],
            rates: RateTable::default(),
        }
    }

    /// Restores a registry from stored currencies and rates.
    ///
    /// The neutral unit is added when missing. Stored data is trusted; the
    /// rules apply to changes made afterwards.
    #[must_use]
    pub fn from_parts(mut currencies: Vec<Currency>, rates: impl Into<RateTable>) -> Self {
        if !currencies.iter().any(Currency::is_neutral) {
            currencies.insert(0, Currency::neutral());
        }
        Self {
            currencies,
            rates: rates.into(),
        }
    }

    /// All currencies, the neutral unit included.
    #[must_use]
    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }

    /// Current rate table.
    #[must_use]
    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Looks up a currency by id.
    #[must_use]
    pub fn get(&self, id: i32) -> Option<&Currency> {
        self.currencies.iter().find(|c| c.id == id)
    }

    /// Looks up a currency by code.
    #[must_use]
    pub fn get_by_code(&self, code: &CurrencyCode) -> Option<&Currency> {
        self.currencies.iter().find(|c| &c.code == code)
    }

    /// The currency marked default, if any.
    #[must_use]
    pub fn default_currency(&self) -> Option<&Currency> {
        self.currencies.iter().find(|c| c.default)
    }

    /// Currencies visible to a caller.
    ///
    /// Admins see everything. Everyone else sees public currencies plus the
    /// ids in `must_fetch` (typically their account's currency).
    #[must_use]
    pub fn list_currencies(&self, is_admin: bool, must_fetch: &[i32]) -> Vec<Currency> {
        self.currencies
            .iter()
            .filter(|c| is_admin || c.public || must_fetch.contains(&c.id))
            .cloned()
            .collect()
    }

    /// Adds a currency.
    ///
    /// An id of `0` is replaced by the next free id and a precision of `0`
    /// by [`DEFAULT_PRECISION`].
    pub fn create_currency(&mut self, mut currency: Currency) -> Result<&Currency, RegistryError> {
        if currency.id == 0 {
            currency.id = self.currencies.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        }
        if currency.precision == 0 {
            currency.precision = DEFAULT_PRECISION;
        }
        normalize(&mut currency)?;

        if currency.default && self.currencies.iter().any(|c| c.default) {
            return Err(RegistryError::DefaultExists);
        }
        if self.currencies.iter().any(|c| c.code == currency.code) {
            return Err(RegistryError::DuplicateCode(currency.code));
        }

        tracing::info!(id = currency.id, code = %currency.code, "Currency created");
        let idx = self.currencies.len();
        self.currencies.push(currency);
        Ok(&self.currencies[idx])
    }

    /// Replaces the currency with the same id.
    pub fn update_currency(&mut self, mut currency: Currency) -> Result<(), RegistryError> {
        normalize(&mut currency)?;

        let id = currency.id;
        if currency.default && self.currencies.iter().any(|c| c.default && c.id != id) {
            return Err(RegistryError::DefaultExists);
        }
        if self
            .currencies
            .iter()
            .any(|c| c.code == currency.code && c.id != id)
        {
            return Err(RegistryError::DuplicateCode(currency.code));
        }

        let existing = self
            .currencies
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RegistryError::CurrencyNotFound(id))?;
        *existing = currency;
        Ok(())
    }

    /// Makes the currency with `id` the platform default.
    ///
    /// Clears the previous default and pins the new default to the neutral
    /// unit with rate 1 in both directions.
    pub fn change_default(&mut self, id: i32) -> Result<(), RegistryError> {
        if id == Currency::NEUTRAL_ID {
            return Err(RegistryError::NeutralDefault);
        }

        let defaults = self.currencies.iter().filter(|c| c.default).count();
        if defaults > 1 {
            tracing::error!(defaults, "More than one default currency");
            return Err(RegistryError::MultipleDefaults(defaults));
        }

        let next = self.get(id).ok_or(RegistryError::CurrencyNotFound(id))?;
        if next.default {
            return Err(RegistryError::AlreadyDefault(next.code.clone()));
        }
        let code = next.code.clone();

        for currency in &mut self.currencies {
            currency.default = currency.id == id;
        }

        let neutral = CurrencyCode::neutral();
        self.rates
            .upsert(ExchangeRate::new(code.clone(), neutral.clone(), Decimal::ONE));
        self.rates
            .upsert(ExchangeRate::new(neutral, code.clone(), Decimal::ONE));

        tracing::info!(id, code = %code, "Default currency changed");
        Ok(())
    }

    /// Adds a rate edge and its reverse `1 / rate` edge.
    ///
    /// One endpoint must be the neutral unit. An existing reverse edge is
    /// replaced.
    pub fn create_rate(
        &mut self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        rate: Decimal,
        commission: Decimal,
    ) -> Result<(), RegistryError> {
        if !from.is_neutral() && !to.is_neutral() {
            return Err(RegistryError::RateWithoutNeutral {
                from: from.clone(),
                to: to.clone(),
            });
        }
        self.check_rate(from, to, rate)?;

        self.rates
            .upsert(ExchangeRate::new(from.clone(), to.clone(), rate).with_commission(commission));
        self.write_reverse(from, to, rate, commission);
        Ok(())
    }

    /// Changes an existing rate edge and rewrites its reverse edge.
    pub fn update_rate(
        &mut self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        rate: Decimal,
        commission: Decimal,
    ) -> Result<(), RegistryError> {
        self.check_rate(from, to, rate)?;
        if self.rates.get(from, to).is_none() {
            return Err(RegistryError::RateNotFound {
                from: from.clone(),
                to: to.clone(),
            });
        }

        self.rates
            .upsert(ExchangeRate::new(from.clone(), to.clone(), rate).with_commission(commission));
        self.write_reverse(from, to, rate, commission);
        Ok(())
    }

    /// Removes a rate edge and, when present, its reverse edge.
    pub fn delete_rate(
        &mut self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<ExchangeRate, RegistryError> {
        let removed = self
            .rates
            .remove(from, to)
            .ok_or_else(|| RegistryError::RateNotFound {
                from: from.clone(),
                to: to.clone(),
            })?;

        if self.rates.remove(to, from).is_none() {
            tracing::warn!(%from, %to, "Reverse rate was already missing");
        }
        Ok(removed)
    }

    /// Builds a converter over the current catalogue and rates.
    pub fn converter(&self) -> Result<CurrencyConverter, CurrencyError> {
        let base = self
            .default_currency()
            .map(|c| c.code.clone())
            .or_else(|| self.rates.detect_default())
            .ok_or(CurrencyError::NoDefaultCurrency)?;

        Ok(CurrencyConverter::new(base, self.rates.clone()).with_currencies(self.currencies.clone()))
    }

    fn check_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        rate: Decimal,
    ) -> Result<(), RegistryError> {
        if rate <= Decimal::ZERO {
            return Err(RegistryError::InvalidRate(rate));
        }
        for code in [from, to] {
            if self.get_by_code(code).is_none() {
                return Err(RegistryError::UnknownCurrency(code.clone()));
            }
        }
        Ok(())
    }

    fn write_reverse(
        &mut self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        rate: Decimal,
        commission: Decimal,
    ) {
        self.rates.remove(to, from);
        self.rates.upsert(
            ExchangeRate::new(to.clone(), from.clone(), Decimal::ONE / rate)
                .with_commission(commission),
        );
    }
}

/// Trims code and title and rejects blanks.
fn normalize(currency: &mut Currency) -> Result<(), RegistryError> {
    currency.code = CurrencyCode::new(currency.code.as_str());
    currency.title = currency.title.trim().to_string();
    if currency.code.is_empty() || currency.title.is_empty() {
        return Err(RegistryError::MissingField);
    }
    Ok(())
}
