//! CSV loading into an immutable snapshot.

use crate::error::LoadError;
use crate::models::{
    parse_live_births, parse_oxygen, ClinicalRecord, ClinicalRow, Facility, FacilityId,
    FacilityRow, GovernanceRecord, GovernanceRow, OperationsRecord, OperationsRow, ProtocolStatus,
};
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const FACILITIES_FILE: &str = "facilities.csv";
pub const CLINICAL_FILE: &str = "clinical_neonatal.csv";
pub const GOVERNANCE_FILE: &str = "governance.csv";
pub const OPERATIONS_FILE: &str = "operations.csv";

/// Locations of the four input files.
#[derive(Debug, Clone)]
pub struct DataFiles {
    pub facilities: PathBuf,
    pub clinical: PathBuf,
    pub governance: PathBuf,
    pub operations: PathBuf,
}

impl DataFiles {
    /// Use the standard file names inside `dir`.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            facilities: dir.join(FACILITIES_FILE),
            clinical: dir.join(CLINICAL_FILE),
            governance: dir.join(GOVERNANCE_FILE),
            operations: dir.join(OPERATIONS_FILE),
        }
    }

    /// Files that do not exist on disk, in declaration order.
    pub fn missing(&self) -> Vec<PathBuf> {
        [
            &self.facilities,
            &self.clinical,
            &self.governance,
            &self.operations,
        ]
        .into_iter()
        .filter(|path| !path.is_file())
        .cloned()
        .collect()
    }
}

/// The four tables as loaded. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct DataSnapshot {
    pub facilities: Vec<Facility>,
    pub clinical: Vec<ClinicalRecord>,
    pub governance: Vec<GovernanceRecord>,
    pub operations: Vec<OperationsRecord>,
    pub loaded_at: DateTime<Utc>,
}

impl DataSnapshot {
    /// Assemble a snapshot, rejecting duplicate facility ids.
    pub fn new(
        facilities: Vec<Facility>,
        clinical: Vec<ClinicalRecord>,
        governance: Vec<GovernanceRecord>,
        operations: Vec<OperationsRecord>,
    ) -> Result<Self, LoadError> {
        let mut seen: HashSet<&FacilityId> = HashSet::with_capacity(facilities.len());
        for facility in &facilities {
            if !seen.insert(&facility.facility_id) {
                return Err(LoadError::DuplicateFacility(facility.facility_id.clone()));
            }
        }

        Ok(Self {
            facilities,
            clinical,
            governance,
            operations,
            loaded_at: Utc::now(),
        })
    }

    /// Row counts per dataset, for logging and metrics.
    pub fn row_counts(&self) -> [(&'static str, usize); 4] {
        [
            ("facilities", self.facilities.len()),
            ("clinical", self.clinical.len()),
            ("governance", self.governance.len()),
            ("operations", self.operations.len()),
        ]
    }
}

/// Load all four datasets.
///
/// Every file is checked up front so a missing-file error names all absent
/// files at once and nothing is parsed.
pub fn load_snapshot(files: &DataFiles) -> Result<DataSnapshot, LoadError> {
    let missing = files.missing();
    if !missing.is_empty() {
        return Err(LoadError::MissingFiles(missing));
    }

    let facilities = read_facilities(&files.facilities)?;
    let clinical = read_clinical(&files.clinical)?;
    let governance = read_governance(&files.governance)?;
    let operations = read_operations(&files.operations)?;

    let snapshot = DataSnapshot::new(facilities, clinical, governance, operations)?;
    for (dataset, rows) in snapshot.row_counts() {
        info!("Loaded {} {} rows", rows, dataset);
    }
    Ok(snapshot)
}

fn read_facilities(path: &Path) -> Result<Vec<Facility>, LoadError> {
    let rows: Vec<FacilityRow> = read_rows(
        path,
        &["facility_id", "facility_name", "district", "tier_level"],
    )?;

    Ok(rows
        .into_iter()
        .map(|row| Facility {
            facility_id: FacilityId::new(row.facility_id),
            facility_name: row.facility_name,
            district: row.district,
            tier_level: row.tier_level,
        })
        .collect())
}

fn read_clinical(path: &Path) -> Result<Vec<ClinicalRecord>, LoadError> {
    let rows: Vec<ClinicalRow> =
        read_rows(path, &["facility_id", "reporting_month", "live_births"])?;

    let mut defaulted = 0;
    let records = rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| {
            let live_births = parse_live_births(row.live_births.as_deref()).unwrap_or_else(|| {
                debug!(
                    "Row {} of {}: live_births {:?} is not a count, using 0",
                    index + 1,
                    path.display(),
                    row.live_births
                );
                defaulted += 1;
                0
            });
            ClinicalRecord {
                facility_id: FacilityId::new(row.facility_id),
                reporting_month: row.reporting_month.unwrap_or_default(),
                live_births,
            }
        })
        .collect();

    if defaulted > 0 {
        warn!(
            "{} live_births values in {} were missing or invalid and counted as 0",
            defaulted,
            path.display()
        );
    }
    Ok(records)
}

fn read_governance(path: &Path) -> Result<Vec<GovernanceRecord>, LoadError> {
    let rows: Vec<GovernanceRow> = read_rows(path, &["facility_id", "newborn_protocol_exists"])?;

    Ok(rows
        .into_iter()
        .map(|row| GovernanceRecord {
            facility_id: FacilityId::new(row.facility_id),
            newborn_protocol_exists: row
                .newborn_protocol_exists
                .as_deref()
                .map(ProtocolStatus::parse)
                .unwrap_or(ProtocolStatus::Missing),
        })
        .collect())
}

fn read_operations(path: &Path) -> Result<Vec<OperationsRecord>, LoadError> {
    let rows: Vec<OperationsRow> =
        read_rows(path, &["facility_id", "oxygen_cylinders_available"])?;

    let mut defaulted = 0;
    let records = rows
        .into_iter()
        .map(|row| {
            let oxygen = parse_oxygen(row.oxygen_cylinders_available.as_deref()).unwrap_or_else(|| {
                defaulted += 1;
                0.0
            });
            OperationsRecord {
                facility_id: FacilityId::new(row.facility_id),
                oxygen_cylinders_available: oxygen,
            }
        })
        .collect();

    if defaulted > 0 {
        debug!(
            "{} oxygen_cylinders_available values in {} were coerced to 0",
            defaulted,
            path.display()
        );
    }
    Ok(records)
}

/// Read every record of a CSV file after checking its header row.
fn read_rows<T: DeserializeOwned>(
    path: &Path,
    required: &[&'static str],
) -> Result<Vec<T>, LoadError> {
    let csv_error = |e: csv::Error| LoadError::Csv {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(csv_error)?;

    let headers = reader.headers().map_err(csv_error)?.clone();
    if let Some(column) = required
        .iter()
        .copied()
        .find(|column| !headers.iter().any(|h| h == *column))
    {
        return Err(LoadError::MissingColumn {
            path: path.to_path_buf(),
            column,
        });
    }

    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(csv_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_files(dir: &Path, facilities: &str, clinical: &str, governance: &str, operations: &str) {
        fs::write(dir.join(FACILITIES_FILE), facilities).unwrap();
        fs::write(dir.join(CLINICAL_FILE), clinical).unwrap();
        fs::write(dir.join(GOVERNANCE_FILE), governance).unwrap();
        fs::write(dir.join(OPERATIONS_FILE), operations).unwrap();
    }

    fn write_sample(dir: &Path) {
        write_files(
            dir,
            "facility_id,facility_name,district,tier_level\n1,Alpha Clinic,North,T1\n2,Beta Hospital,South,T2\n",
            "facility_id,reporting_month,live_births\n1,2024-01,10\n2,2024-02,oops\n",
            "facility_id,newborn_protocol_exists\n1,Yes\n2,\n",
            "facility_id,oxygen_cylinders_available\n1,5\n2,abc\n",
        );
    }

    #[test]
    fn test_load_sample() {
        let dir = TempDir::new().unwrap();
        write_sample(dir.path());

        let snapshot = load_snapshot(&DataFiles::in_dir(dir.path())).unwrap();

        assert_eq!(snapshot.facilities.len(), 2);
        assert_eq!(snapshot.facilities[1].facility_name, "Beta Hospital");
        assert_eq!(snapshot.clinical[0].live_births, 10);
        assert_eq!(snapshot.clinical[1].live_births, 0);
        assert_eq!(snapshot.governance[0].newborn_protocol_exists, ProtocolStatus::Yes);
        assert_eq!(snapshot.governance[1].newborn_protocol_exists, ProtocolStatus::Missing);
        assert_eq!(snapshot.operations[0].oxygen_cylinders_available, 5.0);
        assert_eq!(snapshot.operations[1].oxygen_cylinders_available, 0.0);
    }

    #[test]
    fn test_missing_files_are_all_reported() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(FACILITIES_FILE),
            "facility_id,facility_name,district,tier_level\n",
        )
        .unwrap();

        let err = load_snapshot(&DataFiles::in_dir(dir.path())).unwrap_err();
        match &err {
            LoadError::MissingFiles(paths) => {
                assert_eq!(paths.len(), 3);
                assert!(paths[0].ends_with(CLINICAL_FILE));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("operations.csv"));
    }

    #[test]
    fn test_missing_column() {
        let dir = TempDir::new().unwrap();
        write_sample(dir.path());
        fs::write(
            dir.path().join(OPERATIONS_FILE),
            "facility_id,oxygen\n1,5\n",
        )
        .unwrap();

        let err = load_snapshot(&DataFiles::in_dir(dir.path())).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingColumn { column: "oxygen_cylinders_available", .. }
        ));
    }

    #[test]
    fn test_extra_columns_ignored() {
        let dir = TempDir::new().unwrap();
        write_sample(dir.path());
        fs::write(
            dir.path().join(GOVERNANCE_FILE),
            "facility_id,reviewer,newborn_protocol_exists\n1,Dr X,Outdated\n",
        )
        .unwrap();

        let snapshot = load_snapshot(&DataFiles::in_dir(dir.path())).unwrap();
        assert_eq!(snapshot.governance.len(), 1);
        assert_eq!(snapshot.governance[0].newborn_protocol_exists, ProtocolStatus::Outdated);
    }

    #[test]
    fn test_duplicate_facility_rejected() {
        let dir = TempDir::new().unwrap();
        write_sample(dir.path());
        fs::write(
            dir.path().join(FACILITIES_FILE),
            "facility_id,facility_name,district,tier_level\n1,A,D1,T1\n1,B,D2,T2\n",
        )
        .unwrap();

        let err = load_snapshot(&DataFiles::in_dir(dir.path())).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateFacility(ref id) if id.as_str() == "1"));
    }

    #[test]
    fn test_ragged_row_is_csv_error() {
        let dir = TempDir::new().unwrap();
        write_sample(dir.path());
        fs::write(
            dir.path().join(CLINICAL_FILE),
            "facility_id,reporting_month,live_births\n1,2024-01\n",
        )
        .unwrap();

        let err = load_snapshot(&DataFiles::in_dir(dir.path())).unwrap_err();
        assert_eq!(err.kind(), "csv");
    }
}
