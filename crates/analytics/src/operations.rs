//! Operational performance: oxygen cylinder availability.

use crate::join::inner_join;
use health_perf_ingestion::{Facility, OperationsRecord};
use serde::Serialize;

/// Number of facilities shown in the oxygen ranking.
pub const TOP_OXYGEN_LIMIT: usize = 15;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OxygenAvailability {
    pub facility_name: String,
    pub oxygen_cylinders_available: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OperationsSummary {
    /// Rows in the facilities ⋈ operations join.
    pub joined_rows: usize,
    pub top_oxygen: Vec<OxygenAvailability>,
}

pub fn summarize_operations(
    facilities: &[Facility],
    operations: &[OperationsRecord],
) -> OperationsSummary {
    let joined = inner_join(facilities, operations);
    OperationsSummary {
        joined_rows: joined.len(),
        top_oxygen: rank_by_oxygen(joined, TOP_OXYGEN_LIMIT),
    }
}

/// Rank joined rows by oxygen cylinders, most first, keeping at most `limit`.
///
/// The sort is stable, so equal counts keep join order.
pub fn rank_by_oxygen(
    mut joined: Vec<(&Facility, &OperationsRecord)>,
    limit: usize,
) -> Vec<OxygenAvailability> {
    joined.sort_by(|(_, a), (_, b)| {
        b.oxygen_cylinders_available
            .total_cmp(&a.oxygen_cylinders_available)
    });

    joined
        .into_iter()
        .take(limit)
        .map(|(facility, record)| OxygenAvailability {
            facility_name: facility.facility_name.clone(),
            oxygen_cylinders_available: record.oxygen_cylinders_available,
        })
        .collect()
}
