use crate::api::PriceSource;
use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::models::Purchase;
use crate::strategy::dca::{format_date, DcaSchedule};
use crate::timing::Sleeper;
use chrono::Utc;

/// How a simulation run ended
#[derive(Debug)]
pub enum Termination {
    /// The cursor passed "now"
    Completed,
    /// A step failed; purchases made before the failure are kept
    Aborted(SimulationError),
}

/// Everything a run produced
#[derive(Debug)]
pub struct SimulationReport {
    pub purchases: Vec<Purchase>,
    pub total_btc: f64,
    pub usd_total: f64,
    /// `total_btc / last price`, only set when the run completed
    pub derived_value: Option<f64>,
    pub termination: Termination,
}

impl SimulationReport {
    fn empty() -> Self {
        Self {
            purchases: Vec::new(),
            total_btc: 0.0,
            usd_total: 0.0,
            derived_value: None,
            termination: Termination::Completed,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.termination, Termination::Completed)
    }

    pub fn last_price(&self) -> Option<f64> {
        self.purchases.last().map(|p| p.price)
    }
}

/// Historical DCA simulation driving a price source over a fixed schedule
pub struct DcaSimulation<P, S> {
    config: SimulationConfig,
    schedule: DcaSchedule,
    source: P,
    sleeper: S,
}

impl<P: PriceSource, S: Sleeper> DcaSimulation<P, S> {
    pub fn new(config: SimulationConfig, source: P, sleeper: S) -> Self {
        let schedule = DcaSchedule::new(config.start_timestamp, config.step_secs);
        Self {
            config,
            schedule,
            source,
            sleeper,
        }
    }

    /// Run from the configured start up to the current wall-clock time
    pub async fn run(&self) -> SimulationReport {
        let now = Utc::now().timestamp();
        self.run_until(now).await
    }

    /// Run from the configured start until the cursor passes `now`
    pub async fn run_until(&self, now: i64) -> SimulationReport {
        let mut report = SimulationReport::empty();

        tracing::info!(
            "Starting DCA simulation: start={}, step={}s, contribution=${}",
            self.schedule.start(),
            self.schedule.step(),
            self.config.contribution_usd
        );

        for timestamp in self.schedule.timestamps_until(now) {
            let purchase = match self.buy_at(timestamp).await {
                Ok(purchase) => purchase,
                Err(e) => {
                    println!("Error fetching data: {}", e);
                    report.termination = Termination::Aborted(e);
                    return report;
                }
            };

            report.total_btc += purchase.btc_amount;
            report.usd_total += purchase.usd_amount;

            println!(
                "Timestamp: {}  Currency: {}  Price: {} - 1k USD Equivalent: {:.8} BTC\n",
                purchase.date, purchase.currency, purchase.price_text, purchase.btc_amount
            );
            report.purchases.push(purchase);

            self.sleeper.sleep(self.config.poll_delay).await;
        }

        if let Some(last_price) = report.last_price() {
            report.derived_value = Some(report.total_btc / last_price);
        }

        tracing::info!(
            "DCA simulation finished after {} buys",
            report.purchases.len()
        );

        report
    }

    /// Price one scheduled buy
    async fn buy_at(&self, timestamp: i64) -> Result<Purchase, SimulationError> {
        let date = format_date(timestamp)?;
        let observation = self.source.fetch_price(&date).await?;

        let price = observation
            .parse_price()
            .ok_or_else(|| SimulationError::InvalidPrice {
                date: date.clone(),
                raw: observation.price.clone(),
            })?;

        let usd_amount = self.config.contribution_usd;

        Ok(Purchase {
            timestamp,
            date,
            currency: observation.currency,
            price_text: observation.price,
            price,
            usd_amount,
            btc_amount: usd_amount / price,
        })
    }
}
