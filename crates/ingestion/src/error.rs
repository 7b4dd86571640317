//! Errors raised while loading the datasets.

use crate::models::FacilityId;
use std::path::PathBuf;

/// Error type for dataset loading.
///
/// Any of these aborts the whole load; there is no partial snapshot.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    #[error("CSV files not found: {}. Check that they are in the data directory.", join_paths(.0))]
    MissingFiles(Vec<PathBuf>),
    #[error("{} is missing required column '{column}'", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },
    #[error("Failed to read {}: {message}", .path.display())]
    Csv { path: PathBuf, message: String },
    #[error("Duplicate facility_id '{0}' in the facilities table")]
    DuplicateFacility(FacilityId),
}

impl LoadError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::MissingFiles(_) => "missing_files",
            LoadError::MissingColumn { .. } => "missing_column",
            LoadError::Csv { .. } => "csv",
            LoadError::DuplicateFacility(_) => "duplicate_facility",
        }
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
