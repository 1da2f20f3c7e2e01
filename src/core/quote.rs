//! Quote lookup abstractions and the direct/inverse pair resolver

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::core::currency::{CurrencyCode, CurrencyPair};
use crate::core::error::{AttemptFailure, ConversionError, FetchError};

/// Bid rate and timestamp for one pair key, exactly as quoted.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuote {
    pub bid: f64,
    pub as_of: String,
}

/// A resolved rate, always expressed as 1 origin = `rate` destination.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteResult {
    pub rate: f64,
    pub as_of: String,
    pub pair_used: String,
}

#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Label shown next to results.
    fn name(&self) -> &str;

    async fn fetch_quote(&self, pair: &CurrencyPair) -> Result<RawQuote, FetchError>;
}

struct Attempt {
    pair: CurrencyPair,
    reciprocate: bool,
}

fn attempts_for(origin: &CurrencyCode, destination: &CurrencyCode) -> [Attempt; 2] {
    let direct = CurrencyPair::new(origin, destination);
    let inverse = direct.inverse();
    [
        Attempt {
            pair: direct,
            reciprocate: false,
        },
        Attempt {
            pair: inverse,
            reciprocate: true,
        },
    ]
}

fn rate_from(quote: &RawQuote, attempt: &Attempt) -> Result<f64, FetchError> {
    let malformed = |reason: String| FetchError::Malformed {
        pair: attempt.pair.key(),
        reason,
    };

    if !quote.bid.is_finite() || quote.bid <= 0.0 {
        return Err(malformed(format!("bid must be positive, got {}", quote.bid)));
    }

    let rate = if attempt.reciprocate {
        1.0 / quote.bid
    } else {
        quote.bid
    };

    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(malformed(format!("reciprocal of {} is not usable", quote.bid)))
    }
}

/// Looks up the direct pair first and falls back to the reciprocal of the
/// inverse pair. No retries beyond that and nothing is cached.
#[instrument(
    name = "ResolveQuote",
    skip_all,
    fields(origin = %origin, destination = %destination)
)]
pub async fn resolve_quote(
    source: &dyn QuoteSource,
    origin: &CurrencyCode,
    destination: &CurrencyCode,
) -> Result<QuoteResult, ConversionError> {
    let mut failures = Vec::new();

    for attempt in attempts_for(origin, destination) {
        let key = attempt.pair.key();
        debug!(pair = %key, reciprocate = attempt.reciprocate, "Requesting quote");

        let outcome = source
            .fetch_quote(&attempt.pair)
            .await
            .and_then(|quote| rate_from(&quote, &attempt).map(|rate| (rate, quote.as_of)));

        match outcome {
            Ok((rate, as_of)) => {
                info!(pair = %key, rate, as_of = %as_of, "Quote resolved");
                return Ok(QuoteResult {
                    rate,
                    as_of,
                    pair_used: key,
                });
            }
            Err(error) => {
                if failures.is_empty() {
                    warn!(
                        pair = %key,
                        inverse = %attempt.pair.inverse().key(),
                        error = %error,
                        "Direct quote failed, trying inverse pair"
                    );
                } else {
                    warn!(pair = %key, error = %error, "Inverse quote failed");
                }
                failures.push(AttemptFailure { pair: key, error });
            }
        }
    }

    Err(ConversionError::from_attempts(origin, destination, failures))
}
