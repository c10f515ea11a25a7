use btc_dca::{
    ApiConfig, CoinGeckoClient, DcaMetrics, DcaSimulation, SimulationConfig, TokioSleeper,
};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let api_config = match ApiConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let client = match CoinGeckoClient::new(&api_config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to build HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let simulation = DcaSimulation::new(SimulationConfig::default(), client, TokioSleeper);
    let report = simulation.run().await;

    let metrics = DcaMetrics::from_report(&report);
    metrics.print_report();

    if report.is_completed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn setup_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("btc_dca=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
