//! Canonical currency identifier.
//!
//! Currencies are identified by their `code` only. Titles and numeric ids
//! are descriptive and never used to match rate edges.

use serde::{Deserialize, Serialize};

/// Currency code such as `"EUR"` or the neutral sentinel `"NCU"`.
///
/// Surrounding whitespace is stripped on construction; comparison is exact
/// and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Code of the neutral conversion unit.
    pub const NEUTRAL: &'static str = "NCU";

    /// Creates a code, trimming surrounding whitespace.
    #[must_use]
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_string())
    }

    /// Returns the neutral conversion unit.
    #[must_use]
    pub fn neutral() -> Self {
        Self(Self::NEUTRAL.to_string())
    }

    /// Returns true for the neutral conversion unit.
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        self.0 == Self::NEUTRAL
    }

    /// Returns true if the code is empty after trimming.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CurrencyCode {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl From<&str> for CurrencyCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl PartialEq<str> for CurrencyCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CurrencyCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = Self::new(s);
        if code.is_empty() {
            return Err("Currency code must not be empty".to_string());
        }
        Ok(code)
    }
}
