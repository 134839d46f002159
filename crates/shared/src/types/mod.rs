//! Common types used across the application.

pub mod amount;
pub mod code;

pub use amount::{coerce_amount, coerce_json_amount};
pub use code::CurrencyCode;
