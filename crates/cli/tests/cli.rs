mod cli {
    use assert_cmd::prelude::*;
    use predicates::str::contains;
    use std::fs;
    use std::path::Path;
    use std::process::Command;
    use tempfile::TempDir;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    const NAME: &str = "health-perf";

    fn write_sample(dir: &Path) -> std::io::Result<()> {
        fs::write(
            dir.join("facilities.csv"),
            "facility_id,facility_name,district,tier_level\n1,A,D1,T1\n2,X,D2,T2\n3,Y,D2,T3\n",
        )?;
        fs::write(
            dir.join("clinical_neonatal.csv"),
            "facility_id,reporting_month,live_births\n1,2024-01,10\n1,2024-01,5\n",
        )?;
        fs::write(
            dir.join("governance.csv"),
            "facility_id,newborn_protocol_exists\n1,Yes\n",
        )?;
        fs::write(
            dir.join("operations.csv"),
            "facility_id,oxygen_cylinders_available\n2,5\n3,abc\n",
        )
    }

    #[test]
    fn test_text_report() -> TestResult {
        let dir = TempDir::new()?;
        write_sample(dir.path())?;

        Command::cargo_bin(NAME)?
            .args(["report", "--format", "text", "--data-dir"])
            .arg(dir.path())
            .assert()
            .success()
            .stdout(contains("2024-01  15"))
            .stdout(contains("Yes              1"))
            .stdout(contains("X         5"));
        Ok(())
    }

    #[test]
    fn test_html_report_to_file() -> TestResult {
        let dir = TempDir::new()?;
        write_sample(dir.path())?;
        let output = dir.path().join("dashboard.html");

        Command::cargo_bin(NAME)?
            .args(["report", "--format", "html", "--data-dir"])
            .arg(dir.path())
            .arg("--output")
            .arg(&output)
            .assert()
            .success();

        let html = fs::read_to_string(&output)?;
        assert!(html.contains("<canvas id=\"oxygenChart\">"));
        Ok(())
    }

    #[test]
    fn test_missing_files_fail() -> TestResult {
        let dir = TempDir::new()?;

        Command::cargo_bin(NAME)?
            .args(["report", "--data-dir"])
            .arg(dir.path())
            .assert()
            .failure()
            .stderr(contains("CSV files not found"));
        Ok(())
    }
}
