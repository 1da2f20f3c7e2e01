//! Currency codes and ordered currency pairs

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Codes offered by the front end. The core itself treats codes as opaque.
pub const SUPPORTED_CURRENCIES: [&str; 9] = [
    "USD", "BRL", "EUR", "JPY", "ARS", "CAD", "AUD", "GBP", "CHF",
];

pub const DEFAULT_ORIGIN: &str = "USD";
pub const DEFAULT_DESTINATION: &str = "BRL";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        CurrencyCode(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_supported(&self) -> bool {
        SUPPORTED_CURRENCIES.contains(&self.0.as_str())
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parses user input into one of the supported codes, ignoring case.
impl FromStr for CurrencyCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = CurrencyCode(s.trim().to_uppercase());
        if code.is_supported() {
            Ok(code)
        } else {
            Err(anyhow!(
                "Unsupported currency: {}. Expected one of: {}",
                s,
                SUPPORTED_CURRENCIES.join(", ")
            ))
        }
    }
}

/// One ordering of a quotation table entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyPair {
    pub base: CurrencyCode,
    pub quote: CurrencyCode,
}

impl CurrencyPair {
    pub fn new(base: &CurrencyCode, quote: &CurrencyCode) -> Self {
        CurrencyPair {
            base: base.clone(),
            quote: quote.clone(),
        }
    }

    /// Concatenated codes, the way the quotation service keys its rates.
    pub fn key(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }

    pub fn inverse(&self) -> Self {
        CurrencyPair {
            base: self.quote.clone(),
            quote: self.base.clone(),
        }
    }
}

impl Display for CurrencyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.base, self.quote)
    }
}
