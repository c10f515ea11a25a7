use crate::error::SimulationError;
use chrono::{DateTime, Utc};

/// Date layout the history endpoint expects (`DD-MM-YYYY`)
const API_DATE_FORMAT: &str = "%d-%m-%Y";

/// Dollar Cost Averaging (DCA) schedule
///
/// Buys at fixed intervals regardless of price, starting from a fixed
/// timestamp and walking forward until the present.
///
/// Schedule:
/// - First buy at `start`
/// - Every following buy `step` seconds after the previous one
/// - Stops at the first timestamp past the captured "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DcaSchedule {
    start: i64,
    step: i64,
}

impl DcaSchedule {
    /// Create a new DCA schedule
    ///
    /// # Arguments
    /// * `start` - Seconds since epoch of the first buy
    /// * `step` - Seconds between each buy (must be positive)
    pub fn new(start: i64, step: i64) -> Self {
        assert!(step > 0, "DCA step must be positive");
        Self { start, step }
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    /// Timestamp of the buy following `timestamp`
    pub fn next(&self, timestamp: i64) -> i64 {
        timestamp.saturating_add(self.step)
    }

    /// Every buy timestamp up to and including `now`
    ///
    /// The first buy is always produced, even when `start` is already past `now`.
    pub fn timestamps_until(&self, now: i64) -> impl Iterator<Item = i64> + '_ {
        std::iter::successors(Some(self.start), move |&t| {
            let next = self.next(t);
            (next <= now && next > t).then_some(next)
        })
    }
}

/// Format a unix timestamp as the UTC calendar date the API expects
pub fn format_date(timestamp: i64) -> Result<String, SimulationError> {
    let datetime = DateTime::<Utc>::from_timestamp(timestamp, 0)
        .ok_or(SimulationError::InvalidTimestamp(timestamp))?;
    Ok(datetime.format(API_DATE_FORMAT).to_string())
}
