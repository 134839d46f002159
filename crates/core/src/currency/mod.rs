//! Multi-currency handling and exchange rates.

pub mod conversion;
pub mod error;
pub mod exchange;
pub mod markup;
pub mod rounding;
pub mod service;
pub mod types;

#[cfg(test)]
mod props;

pub use conversion::{convert, try_convert};
pub use error::CurrencyError;
pub use exchange::{ExchangeRate, RateLookup, RateLookupMethod, RateTable, resolve_rate};
pub use markup::{FeeRange, FeeSchedule, MarkupRounding, apply_markup};
pub use rounding::{format_price, to_fixed};
pub use service::CurrencyConverter;
pub use types::{Currency, Rounding};
