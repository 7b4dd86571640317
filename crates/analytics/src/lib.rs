//! Join and aggregation pipelines behind the dashboard sections.
//!
//! Each pipeline is a pure function of the loaded snapshot and is
//! recomputed on every render pass.

pub mod clinical;
pub mod governance;
pub mod join;
pub mod operations;
pub mod report;

pub use report::{DashboardReport, SectionError};
