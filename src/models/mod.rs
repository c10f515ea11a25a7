use serde::{Deserialize, Serialize};

/// Currency label attached to every observation; the history endpoint
/// does not echo the asset symbol back
pub const ASSET_SYMBOL: &str = "BTC";

/// One historical price returned by a price source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceObservation {
    pub currency: String,
    /// USD price as text, exactly as it will be printed
    pub price: String,
}

impl PriceObservation {
    pub fn new(currency: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            price: price.into(),
        }
    }

    /// Parse the price text, rejecting anything that cannot be divided into
    pub fn parse_price(&self) -> Option<f64> {
        self.price
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite() && *p > 0.0)
    }
}

/// A single simulated buy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Purchase {
    pub timestamp: i64,
    pub date: String,
    pub currency: String,
    pub price_text: String,
    pub price: f64,
    pub usd_amount: f64,
    pub btc_amount: f64,
}
