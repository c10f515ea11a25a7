use anyhow::{Context, Result};
use std::time::Duration;

pub const COINGECKO_API_BASE: &str = "https://api.coingecko.com/api/v3";
pub const API_KEY_VAR: &str = "COINGECKO_API_KEY";
const API_BASE_KEY: &str = "coingecko_api_base";

const DEFAULT_START_TIMESTAMP: i64 = 1612796400; // 2021-02-08
const DEFAULT_STEP_SECS: i64 = 2070356; // ~24 days
const DEFAULT_CONTRIBUTION_USD: f64 = 1000.0;
const DEFAULT_POLL_DELAY_SECS: u64 = 5;

/// Connection settings for the price API
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_key: String,
    pub base_url: String,
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: COINGECKO_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Load the API credential from the process environment (and `.env`).
    /// `COINGECKO_API_BASE` may point the client at another host.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .set_default(API_BASE_KEY, COINGECKO_API_BASE)?
            .add_source(config::Environment::default())
            .build()
            .context("Failed to read environment configuration")?;

        Self::from_settings(&settings)
    }

    fn from_settings(settings: &config::Config) -> Result<Self> {
        let api_key = settings
            .get_string(&API_KEY_VAR.to_lowercase())
            .ok()
            .filter(|key| !key.trim().is_empty())
            .with_context(|| format!("{} not found in environment", API_KEY_VAR))?;

        let base_url = settings
            .get_string(API_BASE_KEY)
            .unwrap_or_else(|_| COINGECKO_API_BASE.to_string());

        Ok(Self { api_key, base_url })
    }
}

/// Parameters of one DCA run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// First buy, seconds since epoch
    pub start_timestamp: i64,
    /// Seconds between buys
    pub step_secs: i64,
    /// USD spent on every buy
    pub contribution_usd: f64,
    /// Pause after each step, independent of rate-limit backoff
    pub poll_delay: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_timestamp: DEFAULT_START_TIMESTAMP,
            step_secs: DEFAULT_STEP_SECS,
            contribution_usd: DEFAULT_CONTRIBUTION_USD,
            poll_delay: Duration::from_secs(DEFAULT_POLL_DELAY_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with(key: Option<&str>) -> config::Config {
        let mut builder = config::Config::builder()
            .set_default(API_BASE_KEY, COINGECKO_API_BASE)
            .unwrap();
        if let Some(key) = key {
            builder = builder.set_override("coingecko_api_key", key).unwrap();
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_reads_api_key() {
        let api = ApiConfig::from_settings(&settings_with(Some("secret"))).unwrap();
        assert_eq!(api.api_key, "secret");
        assert_eq!(api.base_url, COINGECKO_API_BASE);
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let err = ApiConfig::from_settings(&settings_with(None)).unwrap_err();
        assert!(err.to_string().contains("COINGECKO_API_KEY not found"));
    }

    #[test]
    fn test_blank_api_key_is_an_error() {
        assert!(ApiConfig::from_settings(&settings_with(Some("  "))).is_err());
    }

    #[test]
    fn test_default_simulation_parameters() {
        let config = SimulationConfig::default();
        assert_eq!(config.start_timestamp, 1612796400);
        assert_eq!(config.step_secs, 2070356);
        assert_eq!(config.contribution_usd, 1000.0);
        assert_eq!(config.poll_delay, Duration::from_secs(5));
    }

    #[test]
    fn test_base_url_can_be_overridden() {
        let settings = config::Config::builder()
            .set_override("coingecko_api_key", "secret")
            .unwrap()
            .set_override(API_BASE_KEY, "http://localhost:9999")
            .unwrap()
            .build()
            .unwrap();

        let api = ApiConfig::from_settings(&settings).unwrap();
        assert_eq!(api.base_url, "http://localhost:9999");
    }

    #[test]
    fn test_with_base_url() {
        let api = ApiConfig::new("k").with_base_url("http://127.0.0.1:1234");
        assert_eq!(api.base_url, "http://127.0.0.1:1234");
    }
}
