//! Error classification for quote lookups and conversions

use crate::core::currency::CurrencyCode;
use std::fmt::Display;
use thiserror::Error;

/// Why a single quotation request did not produce a usable rate.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    #[error("Connection error for {url}: {reason}")]
    Connection { url: String, reason: String },
    #[error("HTTP error: {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("Malformed quote for {pair}: {reason}")]
    Malformed { pair: String, reason: String },
    #[error("Pair {pair} not found in response")]
    MissingPair { pair: String },
}

impl FetchError {
    /// Transport-level failure (DNS, refused connection, timeout).
    pub fn is_connection(&self) -> bool {
        matches!(self, FetchError::Connection { .. })
    }
}

/// A failed attempt for one pair key.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptFailure {
    pub pair: String,
    pub error: FetchError,
}

impl Display for AttemptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.pair, self.error)
    }
}

fn join_attempts(attempts: &[AttemptFailure]) -> String {
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidRequest,
    InvalidAmount,
    QuoteUnavailable,
    ConnectionFailure,
    Unexpected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Critical,
}

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Origin and destination currencies must differ (both are {0})")]
    InvalidRequest(CurrencyCode),
    #[error("Invalid amount '{input}': {reason}")]
    InvalidAmount { input: String, reason: &'static str },
    #[error(
        "No quote found for {origin}-{destination} or its inverse pair ({})",
        join_attempts(.attempts)
    )]
    QuoteUnavailable {
        origin: CurrencyCode,
        destination: CurrencyCode,
        attempts: Vec<AttemptFailure>,
    },
    #[error(
        "Could not reach the quotation service for {origin}-{destination} ({})",
        join_attempts(.attempts)
    )]
    ConnectionFailure {
        origin: CurrencyCode,
        destination: CurrencyCode,
        attempts: Vec<AttemptFailure>,
    },
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ConversionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConversionError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            ConversionError::InvalidAmount { .. } => ErrorKind::InvalidAmount,
            ConversionError::QuoteUnavailable { .. } => ErrorKind::QuoteUnavailable,
            ConversionError::ConnectionFailure { .. } => ErrorKind::ConnectionFailure,
            ConversionError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    /// Validation problems are warnings; anything past validation is critical.
    pub fn severity(&self) -> Severity {
        match self.kind() {
            ErrorKind::InvalidRequest | ErrorKind::InvalidAmount => Severity::Warning,
            _ => Severity::Critical,
        }
    }

    /// Builds the failure for a pair whose every attempt failed.
    pub fn from_attempts(
        origin: &CurrencyCode,
        destination: &CurrencyCode,
        attempts: Vec<AttemptFailure>,
    ) -> Self {
        let origin = origin.clone();
        let destination = destination.clone();
        if !attempts.is_empty() && attempts.iter().all(|a| a.error.is_connection()) {
            ConversionError::ConnectionFailure {
                origin,
                destination,
                attempts,
            }
        } else {
            ConversionError::QuoteUnavailable {
                origin,
                destination,
                attempts,
            }
        }
    }
}

impl From<anyhow::Error> for ConversionError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ConversionError>() {
            Ok(conversion) => conversion,
            Err(other) => ConversionError::Unexpected(format!("{other:#}")),
        }
    }
}
