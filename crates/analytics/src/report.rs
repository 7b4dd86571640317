//! Assembles the three dashboard sections from a snapshot.

use crate::clinical::{summarize_clinical, ClinicalSummary};
use crate::governance::{summarize_governance, GovernanceSummary};
use crate::operations::{summarize_operations, OperationsSummary};
use chrono::{DateTime, Utc};
use health_perf_ingestion::DataSnapshot;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

/// Error confined to one dashboard section. The other sections still render.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SectionError {
    #[error("none of the {rows} clinical rows has a valid reporting_month")]
    NoValidMonths { rows: usize },
}

/// Everything a presenter needs for one render pass.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub data_loaded_at: DateTime<Utc>,
    pub governance: GovernanceSummary,
    #[serde(serialize_with = "serialize_section")]
    pub clinical: Result<ClinicalSummary, SectionError>,
    pub operations: OperationsSummary,
}

impl DashboardReport {
    /// Run every pipeline against the snapshot.
    ///
    /// # Arguments
    /// * `snapshot` - The loaded datasets
    pub fn build(snapshot: &DataSnapshot) -> Self {
        let governance = summarize_governance(&snapshot.facilities, &snapshot.governance);
        debug!(
            "Governance section: {} joined rows, {} compliant",
            governance.joined_rows,
            governance.compliant_facilities.len()
        );

        let clinical = summarize_clinical(&snapshot.clinical, &snapshot.facilities);
        match &clinical {
            Ok(summary) => debug!(
                "Clinical section: {} months, {} districts",
                summary.monthly_trend.len(),
                summary.births_by_district.len()
            ),
            Err(e) => warn!("Clinical section unavailable: {}", e),
        }

        let operations = summarize_operations(&snapshot.facilities, &snapshot.operations);
        debug!(
            "Operations section: {} joined rows",
            operations.joined_rows
        );

        Self {
            generated_at: Utc::now(),
            data_loaded_at: snapshot.loaded_at,
            governance,
            clinical,
            operations,
        }
    }
}

/// `{"status": "ok", "data": ...}` or `{"status": "error", "message": ...}`.
fn serialize_section<T, S>(section: &Result<T, SectionError>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(2))?;
    match section {
        Ok(data) => {
            map.serialize_entry("status", "ok")?;
            map.serialize_entry("data", data)?;
        }
        Err(e) => {
            map.serialize_entry("status", "error")?;
            map.serialize_entry("message", &e.to_string())?;
        }
    }
    map.end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use health_perf_ingestion::{ClinicalRecord, Facility, GovernanceRecord, OperationsRecord};

    fn snapshot(clinical: Vec<ClinicalRecord>) -> DataSnapshot {
        DataSnapshot::new(
            vec![Facility::new("1", "A", "D1", "T1")],
            clinical,
            vec![GovernanceRecord::new("1", "Yes")],
            vec![OperationsRecord::new("1", 4.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_build_report() {
        let report = DashboardReport::build(&snapshot(vec![ClinicalRecord::new("1", "2024-01", 3)]));

        assert_eq!(report.governance.joined_rows, 1);
        assert_eq!(report.operations.top_oxygen.len(), 1);
        assert_eq!(report.clinical.as_ref().unwrap().monthly_trend.len(), 1);
        assert_eq!(report.clinical.as_ref().unwrap().dropped_rows, 0);
    }

    #[test]
    fn test_failed_section_is_isolated() {
        let report = DashboardReport::build(&snapshot(vec![ClinicalRecord::new("1", "bad", 3)]));

        assert_eq!(
            report.clinical.as_ref().unwrap_err(),
            &SectionError::NoValidMonths { rows: 1 }
        );
        assert_eq!(report.governance.compliant_facilities.len(), 1);
        assert_eq!(report.operations.joined_rows, 1);
    }

    #[test]
    fn test_section_serialization() {
        let ok = DashboardReport::build(&snapshot(vec![ClinicalRecord::new("1", "2024-01", 3)]));
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["clinical"]["status"], "ok");
        assert_eq!(json["clinical"]["data"]["monthly_trend"][0]["month"], "2024-01");
        assert_eq!(json["governance"]["protocol_counts"][0]["category"], "Yes");

        let failed = DashboardReport::build(&snapshot(vec![ClinicalRecord::new("1", "bad", 3)]));
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["clinical"]["status"], "error");
        assert!(json["clinical"]["message"]
            .as_str()
            .unwrap()
            .contains("reporting_month"));
    }
}
