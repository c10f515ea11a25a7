pub mod coingecko;

pub use coingecko::{CoinGeckoClient, HistoryResponse};

use crate::error::FetchError;
use crate::models::PriceObservation;
use std::future::Future;

/// Anything that can answer "what did BTC cost on this date"
pub trait PriceSource {
    /// Fetch the USD price for a `DD-MM-YYYY` date
    fn fetch_price(&self, date: &str) -> impl Future<Output = Result<PriceObservation, FetchError>>;
}

impl<P: PriceSource> PriceSource for &P {
    fn fetch_price(&self, date: &str) -> impl Future<Output = Result<PriceObservation, FetchError>> {
        (**self).fetch_price(date)
    }
}
