// Core modules
pub mod api;
pub mod backtest;
pub mod config;
pub mod error;
pub mod models;
pub mod strategy;
pub mod timing;

// Re-export commonly used types
pub use api::{CoinGeckoClient, PriceSource};
pub use backtest::{DcaMetrics, DcaSimulation, SimulationReport, Termination};
pub use config::{ApiConfig, SimulationConfig};
pub use error::{FetchError, SimulationError};
pub use models::*;
pub use timing::{Sleeper, TokioSleeper};
