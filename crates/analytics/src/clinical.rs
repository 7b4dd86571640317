//! Clinical indicators: live births over time and by district.

use crate::join::inner_join;
use crate::report::SectionError;
use health_perf_ingestion::{ClinicalRecord, Facility, ReportingMonth};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyBirths {
    pub month: ReportingMonth,
    pub live_births: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistrictBirths {
    pub district: String,
    pub live_births: u64,
}

/// Monthly totals plus the number of rows skipped for an unparseable month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyTrend {
    pub points: Vec<MonthlyBirths>,
    pub dropped_rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClinicalSummary {
    pub monthly_trend: Vec<MonthlyBirths>,
    /// Clinical rows left out of the trend because their month did not parse.
    pub dropped_rows: usize,
    pub births_by_district: Vec<DistrictBirths>,
}

/// Build the clinical section.
///
/// Fails only when there are clinical rows and none of them has a usable
/// reporting month; the district totals do not depend on the month.
pub fn summarize_clinical(
    clinical: &[ClinicalRecord],
    facilities: &[Facility],
) -> Result<ClinicalSummary, SectionError> {
    let trend = monthly_trend(clinical);
    if trend.points.is_empty() && trend.dropped_rows > 0 {
        return Err(SectionError::NoValidMonths {
            rows: trend.dropped_rows,
        });
    }

    Ok(ClinicalSummary {
        monthly_trend: trend.points,
        dropped_rows: trend.dropped_rows,
        births_by_district: births_by_district(clinical, facilities),
    })
}

/// Sum live births per calendar month, oldest month first.
///
/// Rows whose `reporting_month` does not parse are skipped with a warning.
/// Totals saturate at `u64::MAX`.
pub fn monthly_trend(clinical: &[ClinicalRecord]) -> MonthlyTrend {
    let mut totals: BTreeMap<ReportingMonth, u64> = BTreeMap::new();
    let mut dropped_rows = 0;

    for record in clinical {
        match record.month() {
            Some(month) => {
                let total = totals.entry(month).or_insert(0);
                *total = total.saturating_add(record.live_births);
            }
            None => {
                warn!(
                    "Skipping clinical row for facility {}: unparseable reporting_month {:?}",
                    record.facility_id, record.reporting_month
                );
                dropped_rows += 1;
            }
        }
    }

    MonthlyTrend {
        points: totals
            .into_iter()
            .map(|(month, live_births)| MonthlyBirths { month, live_births })
            .collect(),
        dropped_rows,
    }
}

/// Sum live births per district of the reporting facility.
///
/// Sorted by total descending; equal totals keep the order in which the
/// district first appears in the clinical table. Totals saturate at `u64::MAX`.
pub fn births_by_district(clinical: &[ClinicalRecord], facilities: &[Facility]) -> Vec<DistrictBirths> {
    let mut totals: Vec<DistrictBirths> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for (record, facility) in inner_join(clinical, facilities) {
        match positions.get(facility.district.as_str()) {
            Some(&pos) => {
                let total = &mut totals[pos].live_births;
                *total = total.saturating_add(record.live_births);
            }
            None => {
                positions.insert(facility.district.as_str(), totals.len());
                totals.push(DistrictBirths {
                    district: facility.district.clone(),
                    live_births: record.live_births,
                });
            }
        }
    }

    totals.sort_by(|a, b| b.live_births.cmp(&a.live_births));
    totals
}
