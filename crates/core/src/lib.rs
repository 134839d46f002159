//! Core pricing logic for Pricebook.
//!
//! This crate contains pure functions with ZERO network or storage dependencies.
//! Callers own the rate table; nothing here awaits, retries or caches.
//!
//! # Modules
//!
//! - `currency` - Rate resolution, conversion, rounding and markup
//! - `registry` - Rules for administering currencies and rate edges

pub mod currency;
pub mod registry;
