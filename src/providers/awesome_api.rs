use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::currency::CurrencyPair;
use crate::core::error::FetchError;
use crate::core::quote::{QuoteSource, RawQuote};

const USER_AGENT: &str = concat!("cambio/", env!("CARGO_PKG_VERSION"));

/// Quotes from the AwesomeAPI `json/last` endpoint.
pub struct AwesomeApiProvider {
    base_url: String,
    client: reqwest::Client,
}

impl AwesomeApiProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(AwesomeApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url_for(&self, pair: &CurrencyPair) -> String {
        format!("{}/json/last/{}", self.base_url, pair)
    }
}

#[derive(Debug, Deserialize)]
struct PairQuote {
    bid: String,
    create_date: String,
}

/// Transport failures become `Connection`; anything else reqwest reports
/// (body decoding, request building) means the response was unusable.
fn request_error(url: &str, key: &str, err: reqwest::Error) -> FetchError {
    if err.is_connect() || err.is_timeout() {
        FetchError::Connection {
            url: url.to_string(),
            reason: err.to_string(),
        }
    } else {
        FetchError::Malformed {
            pair: key.to_string(),
            reason: err.to_string(),
        }
    }
}

#[async_trait]
impl QuoteSource for AwesomeApiProvider {
    fn name(&self) -> &str {
        "AwesomeAPI"
    }

    #[instrument(name = "AwesomeApiQuoteFetch", skip_all, fields(pair = %pair))]
    async fn fetch_quote(&self, pair: &CurrencyPair) -> Result<RawQuote, FetchError> {
        let key = pair.key();
        let url = self.url_for(pair);
        debug!("Requesting quote from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| request_error(&url, &key, e))?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        let text = response.text().await.map_err(|e| request_error(&url, &key, e))?;

        let malformed = |reason: String| FetchError::Malformed {
            pair: key.clone(),
            reason,
        };

        // Entries other than the requested pair may not share the quote shape.
        let mut table: HashMap<String, serde_json::Value> = serde_json::from_str(&text)
            .map_err(|e| malformed(format!("invalid JSON response: {e}")))?;

        let entry = table
            .remove(&key)
            .ok_or_else(|| FetchError::MissingPair { pair: key.clone() })?;

        let quote: PairQuote =
            serde_json::from_value(entry).map_err(|e| malformed(e.to_string()))?;

        let bid = quote
            .bid
            .trim()
            .parse::<f64>()
            .map_err(|e| malformed(format!("bid '{}' is not a number: {e}", quote.bid)))?;

        debug!(bid, as_of = %quote.create_date, "Received quote");

        Ok(RawQuote {
            bid,
            as_of: quote.create_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::CurrencyCode;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn pair(base: &str, quote: &str) -> CurrencyPair {
        CurrencyPair::new(&CurrencyCode::new(base), &CurrencyCode::new(quote))
    }

    fn provider(server: &MockServer) -> AwesomeApiProvider {
        AwesomeApiProvider::new(&server.uri(), Duration::from_secs(2)).unwrap()
    }

    async fn mount(server: &MockServer, segment: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(format!("/json/last/{segment}")))
            .respond_with(response)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_successful_quote_fetch() {
        let mock_server = MockServer::start().await;
        let mock_response = r#"{
            "USDBRL": {
                "code": "USD",
                "codein": "BRL",
                "name": "Dólar Americano/Real Brasileiro",
                "high": "5.05",
                "low": "4.98",
                "bid": "5.00",
                "ask": "5.01",
                "timestamp": "1704110400",
                "create_date": "2024-01-01 12:00:00"
            }
        }"#;
        mount(
            &mock_server,
            "USD-BRL",
            ResponseTemplate::new(200).set_body_string(mock_response),
        )
        .await;

        let quote = provider(&mock_server)
            .fetch_quote(&pair("USD", "BRL"))
            .await
            .expect("Failed to get quote");
        assert_eq!(quote.bid, 5.0);
        assert_eq!(quote.as_of, "2024-01-01 12:00:00");
    }

    #[tokio::test]
    async fn test_missing_pair_key() {
        let mock_server = MockServer::start().await;
        let mock_response = r#"{"EURBRL": {"bid": "6.00", "create_date": "2024-01-01 12:00:00"}}"#;
        mount(
            &mock_server,
            "USD-BRL",
            ResponseTemplate::new(200).set_body_string(mock_response),
        )
        .await;

        let result = provider(&mock_server).fetch_quote(&pair("USD", "BRL")).await;
        assert_eq!(
            result.unwrap_err(),
            FetchError::MissingPair {
                pair: "USDBRL".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_api_error_response() {
        let mock_server = MockServer::start().await;
        let not_found = r#"{"status":404,"code":"CoinNotExists","message":"moeda nao encontrada USD-BRL"}"#;
        mount(
            &mock_server,
            "USD-BRL",
            ResponseTemplate::new(404).set_body_string(not_found),
        )
        .await;

        let result = provider(&mock_server).fetch_quote(&pair("USD", "BRL")).await;
        let err = result.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
        assert!(!err.is_connection());
        assert!(err.to_string().starts_with("HTTP error: 404 for "));
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_server = MockServer::start().await;
        mount(
            &mock_server,
            "USD-BRL",
            ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"),
        )
        .await;

        let result = provider(&mock_server).fetch_quote(&pair("USD", "BRL")).await;
        let err = result.unwrap_err();
        assert!(matches!(err, FetchError::Malformed { .. }));
        assert!(err.to_string().contains("Malformed quote for USDBRL"));
    }

    #[tokio::test]
    async fn test_non_numeric_bid() {
        let mock_server = MockServer::start().await;
        let mock_response = r#"{"USDBRL": {"bid": "n/a", "create_date": "2024-01-01 12:00:00"}}"#;
        mount(
            &mock_server,
            "USD-BRL",
            ResponseTemplate::new(200).set_body_string(mock_response),
        )
        .await;

        let err = provider(&mock_server)
            .fetch_quote(&pair("USD", "BRL"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("bid 'n/a' is not a number"));
    }

    #[tokio::test]
    async fn test_timeout_is_connection_error() {
        let mock_server = MockServer::start().await;
        mount(
            &mock_server,
            "USD-BRL",
            ResponseTemplate::new(200)
                .set_body_string("{}")
                .set_delay(Duration::from_millis(500)),
        )
        .await;

        let provider =
            AwesomeApiProvider::new(&mock_server.uri(), Duration::from_millis(100)).unwrap();
        let err = provider.fetch_quote(&pair("USD", "BRL")).await.unwrap_err();
        assert!(err.is_connection());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_connection_error() {
        // Nothing listens on the discard port.
        let provider =
            AwesomeApiProvider::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = provider.fetch_quote(&pair("USD", "BRL")).await.unwrap_err();
        assert!(err.is_connection());
    }

    #[tokio::test]
    async fn test_non_transport_errors_are_malformed() {
        let err = reqwest::Client::new()
            .get("not a url")
            .send()
            .await
            .unwrap_err();
        assert!(!err.is_connect() && !err.is_timeout());

        let fetch_error = request_error("not a url", "USDBRL", err);
        assert!(matches!(fetch_error, FetchError::Malformed { ref pair, .. } if pair == "USDBRL"));
        assert!(!fetch_error.is_connection());
    }

    #[tokio::test]
    async fn test_user_agent_carries_crate_version() {
        use wiremock::matchers::header;

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/last/USD-BRL"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"USDBRL": {"bid": "5.00", "create_date": "2024-01-01 12:00:00"}}"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        assert_eq!(USER_AGENT, format!("cambio/{}", env!("CARGO_PKG_VERSION")));
        provider(&mock_server)
            .fetch_quote(&pair("USD", "BRL"))
            .await
            .expect("Failed to get quote");
        mock_server.verify().await;
    }
}
