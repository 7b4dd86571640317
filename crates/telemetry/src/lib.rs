//! Observability for the health facility performance dashboard.

pub mod metrics;
pub mod logging;

pub use metrics::Metrics;
pub use logging::init_logging;
