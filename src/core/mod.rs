//! Core business logic: quotes, conversion and their supporting types

pub mod config;
pub mod convert;
pub mod currency;
pub mod error;
pub mod format;
pub mod log;
pub mod quote;

// Re-export main types for cleaner imports
pub use convert::{Conversion, ConversionRequest, build_request, convert, parse_amount};
pub use currency::{CurrencyCode, CurrencyPair};
pub use error::{ConversionError, ErrorKind, FetchError, Severity};
pub use quote::{QuoteResult, QuoteSource, RawQuote, resolve_quote};
