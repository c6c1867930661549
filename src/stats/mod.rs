//! Statistics and metrics for client connections

pub mod metrics;

pub use metrics::{ClientStats, StatsSnapshot};
