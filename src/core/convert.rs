//! The conversion pipeline: validate, resolve a quote, multiply, format

use tracing::{error, info, instrument, warn};

use crate::core::currency::CurrencyCode;
use crate::core::error::ConversionError;
use crate::core::format::format_amount;
use crate::core::quote::{QuoteResult, QuoteSource, resolve_quote};

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub amount: f64,
    pub origin: CurrencyCode,
    pub destination: CurrencyCode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub request: ConversionRequest,
    pub converted_amount: f64,
    /// `converted_amount` rendered by [`format_amount`].
    pub formatted: String,
    pub quote: QuoteResult,
}

/// Parses user input such as `"1,5"` or `"100"` into a positive amount.
pub fn parse_amount(input: &str) -> Result<f64, ConversionError> {
    let text = input.trim().replace(',', ".");
    let invalid = |reason| ConversionError::InvalidAmount {
        input: input.trim().to_string(),
        reason,
    };

    if text.is_empty() {
        return Err(invalid("please enter a value"));
    }

    let amount: f64 = text.parse().map_err(|_| invalid("not a number"))?;
    if !amount.is_finite() {
        return Err(invalid("not a number"));
    }
    if amount <= 0.0 {
        return Err(invalid("must be greater than zero"));
    }
    Ok(amount)
}

/// Builds a request from raw form input. The pair is checked before the
/// amount, so choosing the same currency twice is reported first.
pub fn build_request(
    amount: &str,
    origin: &CurrencyCode,
    destination: &CurrencyCode,
) -> Result<ConversionRequest, ConversionError> {
    if origin == destination {
        return Err(ConversionError::InvalidRequest(origin.clone()));
    }
    Ok(ConversionRequest {
        amount: parse_amount(amount)?,
        origin: origin.clone(),
        destination: destination.clone(),
    })
}

fn validate(request: &ConversionRequest) -> Result<(), ConversionError> {
    if request.origin == request.destination {
        return Err(ConversionError::InvalidRequest(request.origin.clone()));
    }
    if !request.amount.is_finite() || request.amount <= 0.0 {
        return Err(ConversionError::InvalidAmount {
            input: request.amount.to_string(),
            reason: "must be greater than zero",
        });
    }
    Ok(())
}

#[instrument(
    name = "Convert",
    skip_all,
    fields(
        amount = request.amount,
        origin = %request.origin,
        destination = %request.destination
    )
)]
pub async fn convert(
    request: ConversionRequest,
    source: &dyn QuoteSource,
) -> Result<Conversion, ConversionError> {
    info!("Starting conversion");

    if let Err(e) = validate(&request) {
        warn!(error = %e, "Rejected conversion request");
        return Err(e);
    }

    let quote = match resolve_quote(source, &request.origin, &request.destination).await {
        Ok(quote) => quote,
        Err(e) => {
            error!(error = %e, "Conversion failed");
            return Err(e);
        }
    };

    let converted_amount = request.amount * quote.rate;
    let formatted = format_amount(converted_amount);

    info!(
        result = converted_amount,
        pair = %quote.pair_used,
        rate = quote.rate,
        "Conversion completed: {:.2} {} (rate {:.4})",
        converted_amount,
        request.destination,
        quote.rate
    );

    Ok(Conversion {
        request,
        converted_amount,
        formatted,
        quote,
    })
}
