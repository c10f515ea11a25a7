// Buy scheduling
pub mod dca;

pub use dca::{format_date, DcaSchedule};
