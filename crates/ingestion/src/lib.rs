//! Dataset loading for the health facility performance dashboard.
//!
//! Reads the four CSV tables into typed records and memoizes the resulting
//! snapshot for the lifetime of the process.

pub mod cache;
pub mod error;
pub mod loader;
pub mod models;

pub use cache::{DatasetCache, LoadOutcome};
pub use error::LoadError;
pub use loader::{load_snapshot, DataFiles, DataSnapshot};
pub use models::{
    ClinicalRecord, Facility, FacilityId, GovernanceRecord, OperationsRecord, ProtocolStatus,
    ReportingMonth,
};
