//! Inner joins on the facility identifier.

use health_perf_ingestion::{
    ClinicalRecord, Facility, FacilityId, GovernanceRecord, OperationsRecord,
};
use std::collections::HashMap;

/// A record that carries a facility identifier.
pub trait FacilityKeyed {
    fn facility_id(&self) -> &FacilityId;
}

impl FacilityKeyed for Facility {
    fn facility_id(&self) -> &FacilityId {
        &self.facility_id
    }
}

impl FacilityKeyed for ClinicalRecord {
    fn facility_id(&self) -> &FacilityId {
        &self.facility_id
    }
}

impl FacilityKeyed for GovernanceRecord {
    fn facility_id(&self) -> &FacilityId {
        &self.facility_id
    }
}

impl FacilityKeyed for OperationsRecord {
    fn facility_id(&self) -> &FacilityId {
        &self.facility_id
    }
}

/// Inner join of two tables on `facility_id`.
///
/// Output follows `left` order; a left row with several matches yields one
/// pair per match, in `right` order. Rows without a match on the other side
/// are dropped.
pub fn inner_join<'a, L, R>(left: &'a [L], right: &'a [R]) -> Vec<(&'a L, &'a R)>
where
    L: FacilityKeyed,
    R: FacilityKeyed,
{
    let mut index: HashMap<&'a FacilityId, Vec<&'a R>> = HashMap::new();
    for row in right {
        index.entry(row.facility_id()).or_default().push(row);
    }

    left.iter()
        .flat_map(|l| {
            index
                .get(l.facility_id())
                .into_iter()
                .flatten()
                .map(move |r| (l, *r))
        })
        .collect()
}
