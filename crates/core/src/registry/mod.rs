//! Currency and rate administration.
//!
//! # Modules
//!
//! - `error` - Registry-specific error types
//! - `service` - Catalogue and rate edge rules

pub mod error;
pub mod service;

pub use error::RegistryError;
pub use service::{CurrencyRegistry, DEFAULT_PRECISION};
