//! Typed records for the four dashboard datasets.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Facility identifier shared by every table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FacilityId(String);

impl FacilityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FacilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FacilityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A healthcare facility. `facility_id` is unique within the facilities table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Facility {
    pub facility_id: FacilityId,
    pub facility_name: String,
    pub district: String,
    pub tier_level: String,
}

impl Facility {
    pub fn new(
        facility_id: impl Into<FacilityId>,
        facility_name: &str,
        district: &str,
        tier_level: &str,
    ) -> Self {
        Self {
            facility_id: facility_id.into(),
            facility_name: facility_name.to_string(),
            district: district.to_string(),
            tier_level: tier_level.to_string(),
        }
    }
}

/// Monthly clinical/neonatal report for one facility.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClinicalRecord {
    pub facility_id: FacilityId,
    /// Raw value from the file; parsed on demand with [`ClinicalRecord::month`].
    pub reporting_month: String,
    pub live_births: u64,
}

impl ClinicalRecord {
    pub fn new(facility_id: impl Into<FacilityId>, reporting_month: &str, live_births: u64) -> Self {
        Self {
            facility_id: facility_id.into(),
            reporting_month: reporting_month.to_string(),
            live_births,
        }
    }

    /// The calendar month this record reports on, if the raw value parses.
    pub fn month(&self) -> Option<ReportingMonth> {
        ReportingMonth::parse(&self.reporting_month)
    }
}

/// Governance review for one facility.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GovernanceRecord {
    pub facility_id: FacilityId,
    pub newborn_protocol_exists: ProtocolStatus,
}

impl GovernanceRecord {
    pub fn new(facility_id: impl Into<FacilityId>, status: &str) -> Self {
        Self {
            facility_id: facility_id.into(),
            newborn_protocol_exists: ProtocolStatus::parse(status),
        }
    }
}

/// Operational resources for one facility.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationsRecord {
    pub facility_id: FacilityId,
    pub oxygen_cylinders_available: f64,
}

impl OperationsRecord {
    pub fn new(facility_id: impl Into<FacilityId>, oxygen_cylinders_available: f64) -> Self {
        Self {
            facility_id: facility_id.into(),
            oxygen_cylinders_available,
        }
    }
}

/// Status of the newborn care protocol at a facility.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProtocolStatus {
    Yes,
    No,
    Outdated,
    /// Blank cell, labelled `(blank)`.
    Missing,
    /// Any other value, kept as written.
    Other(String),
}

impl ProtocolStatus {
    /// Parse a raw cell. Only surrounding whitespace is ignored; any spelling
    /// other than `Yes`, `No` or `Outdated` is kept as its own value.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "" => ProtocolStatus::Missing,
            "Yes" => ProtocolStatus::Yes,
            "No" => ProtocolStatus::No,
            "Outdated" => ProtocolStatus::Outdated,
            other => ProtocolStatus::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ProtocolStatus::Yes => "Yes",
            ProtocolStatus::No => "No",
            ProtocolStatus::Outdated => "Outdated",
            ProtocolStatus::Missing => "(blank)",
            ProtocolStatus::Other(value) => value,
        }
    }
}

impl fmt::Display for ProtocolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ProtocolStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// A calendar month, stored as the first day of that month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReportingMonth(NaiveDate);

impl ReportingMonth {
    pub fn from_ymd(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// Parse a reporting month.
    ///
    /// Accepts `2024-01`, `2024/01`, full dates (`2024-01-15`, `2024/01/15`),
    /// timestamps (`2024-01-15T00:00:00`, `2024-01-15 00:00:00`) and month
    /// names (`Jan 2024`, `January 2024`). The day is discarded.
    pub fn parse(raw: &str) -> Option<Self> {
        let value = raw.trim();
        if value.is_empty() {
            return None;
        }

        let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(value, "%Y/%m/%d"))
            .or_else(|_| NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d"))
            .or_else(|_| NaiveDate::parse_from_str(&format!("{value}/01"), "%Y/%m/%d"))
            .or_else(|_| NaiveDate::parse_from_str(&format!("1 {value}"), "%d %b %Y"))
            .or_else(|_| {
                NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
                    .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
                    .map(|dt| dt.date())
            })
            .ok()?;

        Self::from_ymd(date.year(), date.month())
    }

}

impl fmt::Display for ReportingMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

impl Serialize for ReportingMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Raw `facilities.csv` row.
#[derive(Debug, Deserialize)]
pub(crate) struct FacilityRow {
    pub facility_id: String,
    pub facility_name: String,
    pub district: String,
    pub tier_level: String,
}

/// Raw `clinical_neonatal.csv` row.
#[derive(Debug, Deserialize)]
pub(crate) struct ClinicalRow {
    pub facility_id: String,
    pub reporting_month: Option<String>,
    pub live_births: Option<String>,
}

/// Raw `governance.csv` row.
#[derive(Debug, Deserialize)]
pub(crate) struct GovernanceRow {
    pub facility_id: String,
    pub newborn_protocol_exists: Option<String>,
}

/// Raw `operations.csv` row.
#[derive(Debug, Deserialize)]
pub(crate) struct OperationsRow {
    pub facility_id: String,
    pub oxygen_cylinders_available: Option<String>,
}

/// Parse a live birth count.
///
/// Returns `None` for blank, negative, fractional, non-numeric or
/// out-of-range values; callers substitute 0. Integral floats such as `12.0`
/// are accepted.
pub fn parse_live_births(raw: Option<&str>) -> Option<u64> {
    let value = raw?.trim();
    if let Ok(count) = value.parse::<u64>() {
        return Some(count);
    }
    let float = value.parse::<f64>().ok()?;
    // `u64::MAX as f64` rounds up to 2^64, which is itself out of range.
    if float >= 0.0 && float < u64::MAX as f64 && float.fract() == 0.0 {
        Some(float as u64)
    } else {
        None
    }
}

/// Parse an oxygen cylinder count.
///
/// Returns `None` for blank, non-numeric or non-finite values; callers
/// substitute 0.
pub fn parse_oxygen(raw: Option<&str>) -> Option<f64> {
    let value = raw?.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_formats() {
        let jan = ReportingMonth::from_ymd(2024, 1).unwrap();
        for raw in [
            "2024-01",
            "2024/01",
            "2024-01-15",
            "2024/01/31",
            "2024-01-15T08:30:00",
            "2024-01-15 08:30:00",
            "Jan 2024",
            "January 2024",
            " 2024-01 ",
        ] {
            assert_eq!(ReportingMonth::parse(raw), Some(jan), "failed on {raw:?}");
        }
    }

    #[test]
    fn test_malformed_months() {
        for raw in ["", "   ", "soon", "2024-13", "2024-02-30", "13/2024"] {
            assert_eq!(ReportingMonth::parse(raw), None, "accepted {raw:?}");
        }
    }

    #[test]
    fn test_month_display_and_order() {
        let dec = ReportingMonth::from_ymd(2023, 12).unwrap();
        let jan = ReportingMonth::from_ymd(2024, 1).unwrap();
        assert!(dec < jan);
        assert_eq!(jan.to_string(), "2024-01");
    }

    #[test]
    fn test_protocol_status_parse() {
        assert_eq!(ProtocolStatus::parse("Yes"), ProtocolStatus::Yes);
        assert_eq!(ProtocolStatus::parse(" Yes "), ProtocolStatus::Yes);
        assert_eq!(ProtocolStatus::parse("No"), ProtocolStatus::No);
        assert_eq!(ProtocolStatus::parse("Outdated"), ProtocolStatus::Outdated);
        assert_eq!(ProtocolStatus::parse(""), ProtocolStatus::Missing);
        assert_eq!(
            ProtocolStatus::parse("Under review"),
            ProtocolStatus::Other("Under review".to_string())
        );
        assert_eq!(ProtocolStatus::Missing.label(), "(blank)");
        assert_ne!(ProtocolStatus::parse("Unknown"), ProtocolStatus::Missing);
    }

    #[test]
    fn test_protocol_status_is_case_sensitive() {
        assert_eq!(
            ProtocolStatus::parse("yes"),
            ProtocolStatus::Other("yes".to_string())
        );
        assert_eq!(
            ProtocolStatus::parse("NO"),
            ProtocolStatus::Other("NO".to_string())
        );
        assert_eq!(ProtocolStatus::parse("yes").label(), "yes");
    }

    #[test]
    fn test_live_births_coercion() {
        assert_eq!(parse_live_births(Some("42")), Some(42));
        assert_eq!(parse_live_births(Some(" 7 ")), Some(7));
        assert_eq!(parse_live_births(Some("12.0")), Some(12));
        assert_eq!(parse_live_births(Some("12.5")), None);
        assert_eq!(parse_live_births(Some("-3")), None);
        assert_eq!(parse_live_births(Some("n/a")), None);
        assert_eq!(parse_live_births(None), None);
    }

    #[test]
    fn test_live_births_out_of_range() {
        assert_eq!(parse_live_births(Some("1e30")), None);
        assert_eq!(parse_live_births(Some("18446744073709551616")), None);
        assert_eq!(parse_live_births(Some("inf")), None);
        assert_eq!(parse_live_births(Some("18446744073709551615")), Some(u64::MAX));
        assert_eq!(parse_live_births(Some("1e3")), Some(1000));
    }

    #[test]
    fn test_oxygen_coercion() {
        assert_eq!(parse_oxygen(Some("5")), Some(5.0));
        assert_eq!(parse_oxygen(Some("2.5")), Some(2.5));
        assert_eq!(parse_oxygen(Some("abc")), None);
        assert_eq!(parse_oxygen(Some("NaN")), None);
        assert_eq!(parse_oxygen(Some("")), None);
        assert_eq!(parse_oxygen(None), None);
    }

    #[test]
    fn test_facility_id_trimmed() {
        assert_eq!(FacilityId::new(" 17 "), FacilityId::from("17"));
    }
}
