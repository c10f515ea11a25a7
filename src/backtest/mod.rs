// Historical DCA simulation module
pub mod metrics;
pub mod runner;

pub use metrics::DcaMetrics;
pub use runner::{DcaSimulation, SimulationReport, Termination};
