//! Rates providers and the currency store for Pricebook.
//!
//! This crate owns everything that waits on I/O. The pricing engine in
//! `pricebook-core` only ever sees the snapshots handed out here.
//!
//! # Modules
//!
//! - `provider` - The `RatesProvider` trait and provider selection
//! - `http` - Billing API provider
//! - `file` - JSON snapshot provider
//! - `resource` - Generic list/one/loading container
//! - `store` - Currency store with converter snapshots
//! - `wire` - Payload shapes
//! - `error` - Provider error types

pub mod error;
pub mod file;
pub mod http;
pub mod provider;
pub mod resource;
pub mod store;
pub mod wire;

pub use error::RatesError;
pub use file::{FileRatesProvider, Snapshot};
pub use http::HttpRatesProvider;
pub use provider::{RatesProvider, provider_from_config};
pub use resource::{FetchOutcome, Resource};
pub use store::CurrencyStore;
