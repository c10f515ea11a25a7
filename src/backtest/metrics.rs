use super::runner::SimulationReport;
use serde::{Deserialize, Serialize};

/// Summary figures of a DCA run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DcaMetrics {
    pub buys: usize,
    pub usd_total: f64,
    pub total_btc: f64,
    pub last_price: Option<f64>,
    /// `total_btc / last_price`
    pub derived_value: Option<f64>,
    /// USD paid per BTC on average
    pub average_cost: Option<f64>,
    /// Holdings valued at the last observed price
    pub market_value: Option<f64>,
    pub completed: bool,
}

impl DcaMetrics {
    pub fn from_report(report: &SimulationReport) -> Self {
        let last_price = report.last_price();
        let average_cost = (report.total_btc > 0.0).then(|| report.usd_total / report.total_btc);

        Self {
            buys: report.purchases.len(),
            usd_total: report.usd_total,
            total_btc: report.total_btc,
            last_price,
            derived_value: report.derived_value,
            average_cost,
            market_value: last_price.map(|price| report.total_btc * price),
            completed: report.is_completed(),
        }
    }

    /// Return on the invested USD at the last price, in percent
    pub fn return_pct(&self) -> Option<f64> {
        let value = self.market_value?;
        (self.usd_total > 0.0).then(|| (value - self.usd_total) / self.usd_total * 100.0)
    }

    /// Print the end-of-run summary
    pub fn print_report(&self) {
        println!(
            "\nTotal BTC equivalent for ${}: {:.8} BTC\n - VALUE: {:.2}",
            self.usd_total as i64,
            self.total_btc,
            self.derived_value.unwrap_or(0.0)
        );

        if !self.completed {
            println!(" - Run stopped early after {} buys", self.buys);
        }

        if let Some(cost) = self.average_cost {
            println!(" - Average cost: ${:.2} per BTC", cost);
        }

        if let (Some(value), Some(ret)) = (self.market_value, self.return_pct()) {
            println!(" - Market value: ${:.2} ({:+.2}%)", value, ret);
        }
    }
}
