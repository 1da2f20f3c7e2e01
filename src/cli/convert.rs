use super::ui;
use crate::core::{
    Conversion, ConversionError, CurrencyCode, ErrorKind, QuoteSource, Severity, build_request,
    convert,
};
use tracing::{debug, warn};

/// What the terminal shows for a successful conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionView {
    pub result: String,
    pub source: String,
    pub pair_used: String,
    pub as_of: String,
}

impl ConversionView {
    pub fn new(conversion: &Conversion, source: &str) -> Self {
        ConversionView {
            result: format!(
                "{} {}",
                conversion.formatted, conversion.request.destination
            ),
            source: source.to_string(),
            pair_used: conversion.quote.pair_used.clone(),
            as_of: conversion.quote.as_of.clone(),
        }
    }

    pub fn footer(&self) -> String {
        format!(
            "Source: {} | Pair used: {} | Last quote: {}",
            self.source, self.pair_used, self.as_of
        )
    }

    pub fn display(&self) -> String {
        format!(
            "{}\n{}",
            ui::style_text(&self.result, ui::StyleType::Result),
            ui::style_text(&self.footer(), ui::StyleType::Subtle)
        )
    }
}

/// A blocking message for a failed conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub severity: Severity,
    pub title: &'static str,
    pub detail: String,
}

impl Alert {
    pub fn from_error(err: &ConversionError) -> Self {
        let (title, detail) = match err.kind() {
            ErrorKind::InvalidRequest | ErrorKind::InvalidAmount => ("Warning", err.to_string()),
            ErrorKind::QuoteUnavailable => (
                "Quote Error",
                format!("Could not obtain an exchange rate. Detail: {err}"),
            ),
            ErrorKind::ConnectionFailure => (
                "Connection Error",
                format!(
                    "Failed to connect to the quotation service. Check your internet connection. Detail: {err}"
                ),
            ),
            ErrorKind::Unexpected => (
                "Unexpected Error",
                format!("An unexpected error occurred: {err}"),
            ),
        };
        Alert {
            severity: err.severity(),
            title,
            detail,
        }
    }

    pub fn display(&self) -> String {
        let style_type = match self.severity {
            Severity::Warning => ui::StyleType::Warning,
            Severity::Critical => ui::StyleType::Error,
        };
        format!("{} {}", ui::style_text(self.title, style_type), self.detail)
    }
}

pub fn print_alert(err: &ConversionError) {
    eprintln!("{}", Alert::from_error(err).display());
}

/// Runs one conversion from raw input and prints either the result or an
/// alert. The outcome is returned for the caller to act on.
pub async fn convert_and_display(
    source: &dyn QuoteSource,
    amount: &str,
    origin: &CurrencyCode,
    destination: &CurrencyCode,
) -> Result<Conversion, ConversionError> {
    let outcome = match build_request(amount, origin, destination) {
        Ok(request) => {
            let spinner = ui::new_spinner(format!(
                "Fetching {origin}-{destination} quote from {}...",
                source.name()
            ));
            let outcome = convert(request, source).await;
            spinner.finish_and_clear();
            outcome
        }
        Err(e) => {
            warn!(
                amount = %amount,
                %origin,
                %destination,
                error = %e,
                "Rejected conversion request"
            );
            Err(e)
        }
    };

    match &outcome {
        Ok(conversion) => {
            let view = ConversionView::new(conversion, source.name());
            debug!(?view, "Displaying conversion");
            println!("{}", view.display());
        }
        Err(e) => print_alert(e),
    }
    outcome
}
