use super::PriceSource;
use crate::config::ApiConfig;
use crate::error::FetchError;
use crate::models::{PriceObservation, ASSET_SYMBOL};
use crate::timing::{Sleeper, TokioSleeper};
use reqwest::header::{ACCEPT, RETRY_AFTER};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;

const COIN_ID: &str = "bitcoin";

/// Response from /coins/{id}/history
///
/// Only the fields the simulation reads are modelled; the rest is ignored.
#[derive(Debug, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub market_data: Option<MarketData>,
}

#[derive(Debug, Deserialize)]
pub struct MarketData {
    #[serde(default)]
    pub current_price: CurrentPrice,
}

#[derive(Debug, Default, Deserialize)]
pub struct CurrentPrice {
    #[serde(default)]
    pub usd: Option<f64>,
}

impl HistoryResponse {
    pub fn usd_price(&self) -> Option<f64> {
        self.market_data.as_ref()?.current_price.usd
    }
}

/// CoinGecko historical price client
///
/// Retries rate-limited (429) requests after the server's `Retry-After`
/// delay. There is no pre-emptive throttling.
#[derive(Clone)]
pub struct CoinGeckoClient<S = TokioSleeper> {
    client: Client,
    api_key: String,
    base_url: String,
    sleeper: S,
}

impl CoinGeckoClient<TokioSleeper> {
    /// Create a new CoinGecko client that sleeps on the tokio timer
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        Self::with_sleeper(config, TokioSleeper)
    }
}

impl<S: Sleeper> CoinGeckoClient<S> {
    /// Create a client with a custom rate-limit sleeper
    pub fn with_sleeper(config: &ApiConfig, sleeper: S) -> Result<Self, FetchError> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            sleeper,
        })
    }

    fn history_url(&self) -> String {
        format!("{}/coins/{}/history", self.base_url, COIN_ID)
    }

    async fn send(&self, date: &str) -> Result<Response, FetchError> {
        let response = self
            .client
            .get(self.history_url())
            .query(&[("date", date)])
            .header(ACCEPT, "application/json")
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        Ok(response)
    }

    /// Request a date, waiting out 429 responses that carry a usable `Retry-After`
    async fn request_with_backoff(&self, date: &str) -> Result<Response, FetchError> {
        loop {
            let response = self.send(date).await?;

            if response.status() != StatusCode::TOO_MANY_REQUESTS {
                return Ok(response);
            }

            match retry_after(&response) {
                Some(wait) => {
                    tracing::warn!(
                        "Rate limit exceeded. Waiting {} seconds...",
                        wait.as_secs()
                    );
                    self.sleeper.sleep(wait).await;
                    tracing::info!("Resuming after waiting...");
                }
                // No usable delay: let the body parse report the failure
                None => return Ok(response),
            }
        }
    }

    /// Fetch the BTC/USD price for a `DD-MM-YYYY` date
    pub async fn get_price(&self, date: &str) -> Result<PriceObservation, FetchError> {
        tracing::debug!("Fetching {} price for {}", COIN_ID, date);

        let response = self.request_with_backoff(date).await?;
        let status = response.status();
        let body = response.text().await?;

        parse_history(date, status, &body)
    }
}

impl<S: Sleeper> PriceSource for CoinGeckoClient<S> {
    async fn fetch_price(&self, date: &str) -> Result<PriceObservation, FetchError> {
        self.get_price(date).await
    }
}

/// Delay requested by a 429 response, in whole seconds
fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

fn parse_history(
    date: &str,
    status: StatusCode,
    body: &str,
) -> Result<PriceObservation, FetchError> {
    let data: HistoryResponse =
        serde_json::from_str(body).map_err(|source| FetchError::Decode { status, source })?;

    let usd = data.usd_price().ok_or_else(|| FetchError::MissingPrice {
        date: date.to_string(),
        status,
    })?;

    Ok(PriceObservation::new(ASSET_SYMBOL, usd.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_BODY: &str = r#"{
        "id": "bitcoin",
        "symbol": "btc",
        "name": "Bitcoin",
        "market_data": {
            "current_price": { "eur": 32248.79, "usd": 38953.52785312 },
            "market_cap": { "usd": 725574498093.5 },
            "total_volume": { "usd": 66215843036.84 }
        }
    }"#;

    /// Helper to get API key from env or skip test
    fn get_test_api_key() -> Option<String> {
        std::env::var("COINGECKO_API_KEY").ok()
    }

    #[test]
    fn test_parse_history() {
        let obs = parse_history("08-02-2021", StatusCode::OK, SAMPLE_BODY).unwrap();
        assert_eq!(obs.currency, "BTC");
        assert_eq!(obs.price, "38953.52785312");
    }

    #[test]
    fn test_parse_history_integer_price() {
        let body = r#"{"market_data":{"current_price":{"usd":20000}}}"#;
        let obs = parse_history("01-01-2023", StatusCode::OK, body).unwrap();
        assert_eq!(obs.price, "20000");
    }

    #[test]
    fn test_parse_history_missing_market_data() {
        // CoinGecko answers dates before listing with just the coin identity
        let body = r#"{"id":"bitcoin","symbol":"btc","name":"Bitcoin"}"#;
        let err = parse_history("01-01-2009", StatusCode::OK, body).unwrap_err();
        assert!(matches!(err, FetchError::MissingPrice { .. }));
    }

    #[test]
    fn test_parse_history_missing_usd() {
        let body = r#"{"market_data":{"current_price":{"eur":1.0}}}"#;
        let err = parse_history("01-01-2023", StatusCode::OK, body).unwrap_err();
        assert!(matches!(err, FetchError::MissingPrice { .. }));
    }

    #[test]
    fn test_parse_history_wrong_type_is_decode_error() {
        let body = r#"{"market_data":{"current_price":{"usd":"lots"}}}"#;
        let err = parse_history("01-01-2023", StatusCode::OK, body).unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }

    #[test]
    fn test_parse_history_not_json() {
        let err = parse_history("01-01-2023", StatusCode::BAD_GATEWAY, "<html>").unwrap_err();
        match err {
            FetchError::Decode { status, .. } => assert_eq!(status, StatusCode::BAD_GATEWAY),
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_history_url() {
        let config = ApiConfig::new("key").with_base_url("http://localhost:1234/api/v3/");
        let client = CoinGeckoClient::new(&config).unwrap();
        assert_eq!(
            client.history_url(),
            "http://localhost:1234/api/v3/coins/bitcoin/history"
        );
    }

    #[tokio::test]
    #[ignore] // Requires API key and network
    async fn test_get_price_live() {
        let api_key = get_test_api_key().expect("COINGECKO_API_KEY not set");
        let client = CoinGeckoClient::new(&ApiConfig::new(api_key)).unwrap();

        let obs = client.get_price("08-02-2021").await.unwrap();

        let price = obs.parse_price().expect("price should be numeric");
        assert!(
            price > 30_000.0 && price < 50_000.0,
            "Unexpected BTC price on 08-02-2021: {}",
            price
        );
    }
}
