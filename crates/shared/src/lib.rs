//! Shared types, errors, and configuration for Pricebook.
//!
//! This crate provides common types used across all other crates:
//! - Canonical currency identifiers
//! - Lenient amount coercion for untrusted input
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use types::{CurrencyCode, coerce_amount};
