//! Exchange rate types and lookup.
//!
//! A rate table is a list of directed edges. It is neither symmetric nor
//! transitively closed: lookups only ever consult a single edge.

use pricebook_shared::CurrencyCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Exchange rate between two currencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Source currency code.
    pub from: CurrencyCode,
    /// Target currency code.
    pub to: CurrencyCode,
    /// Exchange rate (1 from = rate to).
    pub rate: Decimal,
    /// Commission in percent charged on top of the rate.
    #[serde(default)]
    pub commission: Decimal,
}

impl ExchangeRate {
    /// Creates a new exchange rate without commission.
    #[must_use]
    pub fn new(from: impl Into<CurrencyCode>, to: impl Into<CurrencyCode>, rate: Decimal) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            rate,
            commission: Decimal::ZERO,
        }
    }

    /// Sets the commission percentage.
    #[must_use]
    pub fn with_commission(mut self, commission: Decimal) -> Self {
        self.commission = commission;
        self
    }

    /// Returns the inverse rate, or `None` when the rate is zero.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        if self.rate.is_zero() {
            return None;
        }
        Some(Self {
            from: self.to.clone(),
            to: self.from.clone(),
            rate: Decimal::ONE / self.rate,
            commission: self.commission,
        })
    }

    /// Rate with the commission applied: `rate + rate * commission / 100`.
    #[must_use]
    pub fn rate_with_commission(&self) -> Decimal {
        self.rate + self.rate * (self.commission / HUNDRED)
    }

    /// Returns true if this edge touches the neutral unit.
    #[must_use]
    pub fn touches_neutral(&self) -> bool {
        self.from.is_neutral() || self.to.is_neutral()
    }
}

/// Finds the rate for `from -> to` in `rates`.
///
/// - Same currency always resolves to `1`, even for an empty table.
/// - An exact `from -> to` edge wins.
/// - Otherwise, when `to` is the base currency an edge ending at `NCU` is
///   accepted, and when `from` is the base an edge starting at `NCU` is.
/// - There is no multi-hop search: `A -> B` and `B -> C` never produce `A -> C`.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use pricebook_core::currency::{ExchangeRate, resolve_rate};
/// use pricebook_shared::CurrencyCode;
///
/// let base = CurrencyCode::new("USD");
/// let rates = vec![ExchangeRate::new("NCU", "EUR", dec!(0.9))];
///
/// let rate = resolve_rate(&base, &CurrencyCode::new("EUR"), &rates, &base);
/// assert_eq!(rate, Some(dec!(0.9)));
/// ```
#[must_use]
pub fn resolve_rate(
    from: &CurrencyCode,
    to: &CurrencyCode,
    rates: &[ExchangeRate],
    base: &CurrencyCode,
) -> Option<Decimal> {
    if from == to {
        return Some(Decimal::ONE);
    }
    find_edge(from, to, rates, base).map(|edge| edge.rate)
}

fn find_edge<'a>(
    from: &CurrencyCode,
    to: &CurrencyCode,
    rates: &'a [ExchangeRate],
    base: &CurrencyCode,
) -> Option<&'a ExchangeRate> {
    if let Some(direct) = rates.iter().find(|r| &r.from == from && &r.to == to) {
        return Some(direct);
    }

    let from_matches = |edge: &CurrencyCode| edge == from || (from == base && edge.is_neutral());
    let to_matches = |edge: &CurrencyCode| edge == to || (to == base && edge.is_neutral());

    let substituted = rates
        .iter()
        .find(|r| from_matches(&r.from) && to_matches(&r.to));

    if substituted.is_none() {
        tracing::debug!(%from, %to, %base, "No exchange rate edge");
    }
    substituted
}

/// How an exchange rate was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateLookupMethod {
    /// Same currency, rate is 1 by definition.
    Identity,
    /// Direct edge found (from -> to).
    Direct,
    /// Reverse edge found (to -> from) and inverted.
    Inverse,
}

/// Result of a rate lookup with inverse fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLookup {
    /// The exchange rate.
    pub rate: Decimal,
    /// How the rate was obtained.
    pub method: RateLookupMethod,
}

/// A snapshot of known exchange rates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable {
    rates: Vec<ExchangeRate>,
}

impl RateTable {
    /// Creates a table from edges, keeping their order.
    #[must_use]
    pub const fn new(rates: Vec<ExchangeRate>) -> Self {
        Self { rates }
    }

    /// Returns all edges in table order.
    #[must_use]
    pub fn as_slice(&self) -> &[ExchangeRate] {
        &self.rates
    }

    /// Number of edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Returns true if the table has no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Returns the exact `from -> to` edge.
    #[must_use]
    pub fn get(&self, from: &CurrencyCode, to: &CurrencyCode) -> Option<&ExchangeRate> {
        self.rates.iter().find(|r| &r.from == from && &r.to == to)
    }

    /// Inserts or replaces the `from -> to` edge.
    pub fn upsert(&mut self, rate: ExchangeRate) {
        match self
            .rates
            .iter_mut()
            .find(|r| r.from == rate.from && r.to == rate.to)
        {
            Some(existing) => *existing = rate,
            None => self.rates.push(rate),
        }
    }

    /// Removes the `from -> to` edge, returning it if present.
    pub fn remove(&mut self, from: &CurrencyCode, to: &CurrencyCode) -> Option<ExchangeRate> {
        let idx = self
            .rates
            .iter()
            .position(|r| &r.from == from && &r.to == to)?;
        Some(self.rates.remove(idx))
    }

    /// See [`resolve_rate`].
    #[must_use]
    pub fn resolve(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        base: &CurrencyCode,
    ) -> Option<Decimal> {
        resolve_rate(from, to, &self.rates, base)
    }

    /// Like [`RateTable::resolve`] but returns the whole edge.
    #[must_use]
    pub fn resolve_edge(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        base: &CurrencyCode,
    ) -> Option<&ExchangeRate> {
        find_edge(from, to, &self.rates, base)
    }

    /// Resolves `from -> to`, falling back to the inverted `to -> from` edge.
    #[must_use]
    pub fn resolve_or_inverse(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        base: &CurrencyCode,
    ) -> Option<RateLookup> {
        if from == to {
            return Some(RateLookup {
                rate: Decimal::ONE,
                method: RateLookupMethod::Identity,
            });
        }

        if let Some(rate) = resolve_rate(from, to, &self.rates, base).filter(|r| !r.is_zero()) {
            return Some(RateLookup {
                rate,
                method: RateLookupMethod::Direct,
            });
        }

        resolve_rate(to, from, &self.rates, base)
            .filter(|r| !r.is_zero())
            .map(|rate| RateLookup {
                rate: Decimal::ONE / rate,
                method: RateLookupMethod::Inverse,
            })
    }

    /// Detects the platform's base currency.
    ///
    /// The base is the non-neutral endpoint of an edge with rate exactly 1
    /// that touches `NCU`.
    #[must_use]
    pub fn detect_default(&self) -> Option<CurrencyCode> {
        self.rates
            .iter()
            .find(|r| r.rate == Decimal::ONE && r.touches_neutral() && r.from != r.to)
            .map(|r| {
                if r.from.is_neutral() {
                    r.to.clone()
                } else {
                    r.from.clone()
                }
            })
    }
}

impl From<Vec<ExchangeRate>> for RateTable {
    fn from(rates: Vec<ExchangeRate>) -> Self {
        Self::new(rates)
    }
}

impl<'a> IntoIterator for &'a RateTable {
    type Item = &'a ExchangeRate;
    type IntoIter = std::slice::Iter<'a, ExchangeRate>;

    fn into_iter(self) -> Self::IntoIter {
        self.rates.iter()
    }
}
