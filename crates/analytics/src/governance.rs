//! Governance & compliance section: newborn protocol status.

use crate::join::inner_join;
use health_perf_ingestion::{Facility, GovernanceRecord, ProtocolStatus};
use serde::Serialize;
use std::collections::HashMap;

/// Number of joined rows sharing one protocol status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// A facility whose newborn protocol exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompliantFacility {
    pub facility_name: String,
    pub district: String,
    pub tier_level: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GovernanceSummary {
    /// Rows in the facilities ⋈ governance join.
    pub joined_rows: usize,
    pub protocol_counts: Vec<CategoryCount>,
    pub compliant_facilities: Vec<CompliantFacility>,
}

/// Join facilities with governance records and summarize protocol status.
pub fn summarize_governance(
    facilities: &[Facility],
    governance: &[GovernanceRecord],
) -> GovernanceSummary {
    let joined = inner_join(facilities, governance);

    GovernanceSummary {
        joined_rows: joined.len(),
        protocol_counts: protocol_counts(&joined),
        compliant_facilities: compliant_facilities(&joined),
    }
}

/// Count joined rows per protocol status.
///
/// Each distinct status is its own category. Sorted by count descending;
/// equal counts keep the order in which the status first appears.
pub fn protocol_counts(joined: &[(&Facility, &GovernanceRecord)]) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = Vec::new();
    let mut positions: HashMap<&ProtocolStatus, usize> = HashMap::new();

    for (_, record) in joined {
        let status = &record.newborn_protocol_exists;
        match positions.get(status) {
            Some(&pos) => counts[pos].count += 1,
            None => {
                positions.insert(status, counts.len());
                counts.push(CategoryCount {
                    category: status.label().to_string(),
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Joined rows whose protocol status is `Yes`, in join order.
pub fn compliant_facilities(joined: &[(&Facility, &GovernanceRecord)]) -> Vec<CompliantFacility> {
    joined
        .iter()
        .filter(|(_, record)| record.newborn_protocol_exists == ProtocolStatus::Yes)
        .map(|(facility, _)| CompliantFacility {
            facility_name: facility.facility_name.clone(),
            district: facility.district.clone(),
            tier_level: facility.tier_level.clone(),
        })
        .collect()
}
