//! Process-lifetime memoization of the dataset load.

use crate::error::LoadError;
use crate::loader::{load_snapshot, DataFiles, DataSnapshot};
use health_perf_telemetry::Metrics;
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use tracing::{error, info};

/// Result of the one-time load. A failure is cached too, so every render
/// pass reports the same error without touching the disk again.
pub type LoadOutcome = Result<Arc<DataSnapshot>, LoadError>;

/// Loads the datasets on first use and hands out the same snapshot afterwards.
pub struct DatasetCache {
    files: DataFiles,
    metrics: Metrics,
    outcome: OnceLock<LoadOutcome>,
}

impl DatasetCache {
    /// Create a cache for the given files. Nothing is read until [`DatasetCache::get`].
    ///
    /// # Arguments
    /// * `files` - Locations of the four CSV inputs
    /// * `metrics` - Metrics collector
    pub fn new(files: DataFiles, metrics: Metrics) -> Self {
        Self {
            files,
            metrics,
            outcome: OnceLock::new(),
        }
    }

    /// Return the cached outcome, loading it first if needed.
    ///
    /// Concurrent callers block until the single load finishes.
    pub fn get(&self) -> &LoadOutcome {
        self.outcome.get_or_init(|| self.load())
    }

    /// Whether a load (successful or not) has already happened.
    pub fn is_loaded(&self) -> bool {
        self.outcome.get().is_some()
    }

    fn load(&self) -> LoadOutcome {
        let start = Instant::now();
        let result = load_snapshot(&self.files);
        self.metrics.observe_load_duration(start.elapsed().as_secs_f64());

        match result {
            Ok(snapshot) => {
                for (dataset, rows) in snapshot.row_counts() {
                    self.metrics.set_rows_loaded(dataset, rows);
                }
                let malformed = snapshot
                    .clinical
                    .iter()
                    .filter(|record| record.month().is_none())
                    .count();
                if malformed > 0 {
                    self.metrics.inc_rows_dropped("malformed_month", malformed as u64);
                }
                info!("Dataset snapshot cached");
                Ok(Arc::new(snapshot))
            }
            Err(e) => {
                error!("Failed to load datasets: {}", e);
                self.metrics.inc_load_failures(e.kind());
                Err(e)
            }
        }
    }
}
