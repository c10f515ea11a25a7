use reqwest::StatusCode;
use thiserror::Error;

/// Failure while retrieving one historical price observation
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request could not be built or sent, or the body could not be read
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Body was not JSON of the expected shape
    #[error("failed to decode price response (HTTP {status}): {source}")]
    Decode {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },

    /// Body parsed but carried no `market_data.current_price.usd` field
    #[error("no USD price in response for {date} (HTTP {status})")]
    MissingPrice { date: String, status: StatusCode },
}

/// Anything that ends a simulation run early
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("invalid price {raw:?} for {date}")]
    InvalidPrice { date: String, raw: String },

    #[error("timestamp {0} is outside the representable date range")]
    InvalidTimestamp(i64),
}
