use crate::error::RateError;
use crate::rate_provider::{RateProvider, RateSnapshot};
use async_trait::async_trait;
use chrono::Local;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, instrument};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// FrankfurterProvider implementation for RateProvider
pub struct FrankfurterProvider {
    base_url: String,
    timeout: Duration,
}

impl FrankfurterProvider {
    pub fn new(base_url: &str) -> Self {
        FrankfurterProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        FrankfurterProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    fn client(&self) -> Result<reqwest::Client, RateError> {
        reqwest::Client::builder()
            .user_agent("fxt/1.0")
            .timeout(self.timeout)
            .build()
            .map_err(|e| RateError::Network(format!("failed to build HTTP client: {e}")))
    }

    async fn get_text(&self, url: &str, context: &str) -> Result<String, RateError> {
        let response = self
            .client()?
            .get(url)
            .send()
            .await
            .map_err(|e| RateError::Network(format!("request failed for {context}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RateError::Network(format!("HTTP {status} for {context}")));
        }

        response
            .text()
            .await
            .map_err(|e| RateError::Network(format!("failed to read response for {context}: {e}")))
    }
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    base: String,
    date: String,
    rates: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct ConversionResponse {
    rates: BTreeMap<String, f64>,
}

#[async_trait]
impl RateProvider for FrankfurterProvider {
    #[instrument(
        name = "FrankfurterLatest",
        skip(self),
        fields(base = %base)
    )]
    async fn latest(&self, base: &str) -> Result<RateSnapshot, RateError> {
        let url = format!("{}/latest?from={}", self.base_url, base);
        debug!("Requesting latest rates from {}", url);

        let text = self.get_text(&url, &format!("base {base}")).await?;

        let data: LatestResponse = serde_json::from_str(&text)
            .map_err(|e| RateError::Parse(format!("unexpected rates response for base {base}: {e}")))?;

        if let Some((code, rate)) = data
            .rates
            .iter()
            .find(|(_, rate)| !rate.is_finite() || **rate <= 0.0)
        {
            return Err(RateError::Parse(format!(
                "invalid rate {rate} for {code} in response for base {base}"
            )));
        }

        Ok(RateSnapshot {
            base: data.base,
            date: data.date,
            retrieved_at: Local::now(),
            rates: data.rates,
        })
    }

    async fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64, RateError> {
        let pair = format!("{from} -> {to}");
        let url = format!(
            "{}/latest?amount={}&from={}&to={}",
            self.base_url, amount, from, to
        );
        debug!("Requesting conversion from {}", url);

        let text = self.get_text(&url, &pair).await?;

        let data: ConversionResponse = serde_json::from_str(&text)
            .map_err(|e| RateError::Parse(format!("unexpected conversion response for {pair}: {e}")))?;

        data.rates
            .get(to)
            .copied()
            .ok_or_else(|| RateError::Conversion(format!("no rate for {to} in response for {pair}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_mock_server(base: &str, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("from", base))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_latest_fetch() {
        let mock_response =
            r#"{"base":"USD","date":"2024-01-15","rates":{"EUR":0.92,"GBP":0.79}}"#;
        let mock_server = create_mock_server("USD", mock_response).await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let snapshot = provider.latest("USD").await.unwrap();

        assert_eq!(snapshot.base, "USD");
        assert_eq!(snapshot.date, "2024-01-15");
        assert_eq!(snapshot.rates.get("EUR"), Some(&0.92));
        assert_eq!(snapshot.rates.get("GBP"), Some(&0.79));
        assert!(!snapshot.retrieved_at.to_string().is_empty());
        assert!(snapshot.rates.values().all(|r| r.is_finite() && *r > 0.0));
    }

    #[tokio::test]
    async fn test_latest_fetch_http_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let result = provider.latest("USD").await;

        let err = result.unwrap_err();
        assert!(matches!(err, RateError::Network(_)));
        assert_eq!(
            err.to_string(),
            "Network error: HTTP 500 Internal Server Error for base USD"
        );
    }

    #[tokio::test]
    async fn test_latest_fetch_unreachable_host() {
        // Nothing listens on this port; the connection is refused.
        let provider = FrankfurterProvider::new("http://127.0.0.1:9");
        let result = provider.latest("USD").await;

        let err = result.unwrap_err();
        assert!(matches!(err, RateError::Network(_)));
        assert!(err.to_string().contains("request failed for base USD"));
    }

    #[tokio::test]
    async fn test_latest_fetch_timeout() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"base":"USD","date":"2024-01-15","rates":{}}"#)
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let provider =
            FrankfurterProvider::with_timeout(&mock_server.uri(), Duration::from_millis(50));
        let result = provider.latest("USD").await;

        assert!(matches!(result.unwrap_err(), RateError::Network(_)));
    }

    #[tokio::test]
    async fn test_latest_fetch_malformed_response() {
        let mock_server = create_mock_server("USD", r#"{"unexpected":"shape"}"#).await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let result = provider.latest("USD").await;

        let err = result.unwrap_err();
        assert!(matches!(err, RateError::Parse(_)));
        assert!(
            err.to_string()
                .contains("unexpected rates response for base USD")
        );
    }

    #[tokio::test]
    async fn test_latest_fetch_rejects_non_positive_rate() {
        let mock_response = r#"{"base":"USD","date":"2024-01-15","rates":{"EUR":-0.5}}"#;
        let mock_server = create_mock_server("USD", mock_response).await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let result = provider.latest("USD").await;

        let err = result.unwrap_err();
        assert!(matches!(err, RateError::Parse(_)));
        assert!(err.to_string().contains("invalid rate -0.5 for EUR"));
    }

    #[tokio::test]
    async fn test_successful_conversion() {
        let mock_server = MockServer::start().await;
        let mock_response =
            r#"{"amount":100.0,"base":"USD","date":"2024-01-15","rates":{"EUR":92.0}}"#;

        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("amount", "100"))
            .and(query_param("from", "USD"))
            .and(query_param("to", "EUR"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let converted = provider.convert(100.0, "USD", "EUR").await.unwrap();
        assert_eq!(converted, 92.0);
    }

    #[tokio::test]
    async fn test_conversion_missing_target_currency() {
        let mock_server = MockServer::start().await;
        let mock_response =
            r#"{"amount":100.0,"base":"USD","date":"2024-01-15","rates":{"GBP":79.0}}"#;

        Mock::given(method("GET"))
            .and(path("/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let result = provider.convert(100.0, "USD", "EUR").await;

        let err = result.unwrap_err();
        assert!(matches!(err, RateError::Conversion(_)));
        assert_eq!(
            err.to_string(),
            "Conversion error: no rate for EUR in response for USD -> EUR"
        );
    }

    #[tokio::test]
    async fn test_conversion_http_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let result = provider.convert(100.0, "USD", "XXX").await;

        assert!(matches!(result.unwrap_err(), RateError::Network(_)));
    }

    #[tokio::test]
    async fn test_conversion_malformed_response() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let result = provider.convert(100.0, "USD", "EUR").await;

        assert!(matches!(result.unwrap_err(), RateError::Parse(_)));
    }
}
