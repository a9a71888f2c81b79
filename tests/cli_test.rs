//! Runs the compute-validator binary against fixture workbooks

use std::process::Command;
use validator_lib::test_utils::{WorkbookFixture, data_row, read_sheet};

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_compute-validator"))
}

fn flagged_fixture() -> WorkbookFixture {
    WorkbookFixture::new().row(data_row(
        "SBG-A",
        "BAN-001",
        "Billing",
        "srv-001",
        "TBD",
        ["Linux", "", "16GB", "200GB", "10Gb", "AWS"],
    ))
}

#[test]
fn test_cli_writes_report_and_statistics() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Combined.xlsx");
    let output = dir.path().join("report.xlsx");
    let stats = dir.path().join("stats.json");
    std::fs::write(&input, flagged_fixture().to_bytes()).unwrap();

    let result = binary()
        .current_dir(dir.path())
        .arg("--excel-file")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--stats-file")
        .arg(&stats)
        .output()
        .unwrap();

    assert!(result.status.success(), "stderr: {}", String::from_utf8_lossy(&result.stderr));
    assert!(String::from_utf8_lossy(&result.stdout).contains("Generated 1 records."));

    let report = std::fs::read(&output).unwrap();
    assert_eq!(read_sheet(&report, "Compute").len(), 2);

    let stats: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&stats).unwrap()).unwrap();
    assert_eq!(stats["total_records"], 1);
    assert_eq!(stats["category_breakdown"]["Compute"], 1);
}

#[test]
fn test_cli_rejects_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Combined.csv");
    std::fs::write(&input, b"a,b,c").unwrap();

    let result = binary()
        .current_dir(dir.path())
        .arg("--excel-file")
        .arg(&input)
        .output()
        .unwrap();

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    let first_line = stderr.lines().next().unwrap();
    let body: serde_json::Value = serde_json::from_str(first_line).unwrap();
    assert_eq!(
        body["error"],
        "Invalid file format. Please upload an Excel file (.xlsx or .xls)"
    );
    assert!(!dir.path().join("Compute_Validation_Report.xlsx").exists());
}

#[test]
fn test_cli_failure_leaves_no_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Combined.xlsx");
    let output = dir.path().join("report.xlsx");
    std::fs::write(&input, WorkbookFixture::new().to_bytes()).unwrap();

    let result = binary()
        .current_dir(dir.path())
        .arg("--excel-file")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .output()
        .unwrap();

    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("No records found with 'TBD'"));
    assert!(!output.exists());
    assert!(dir.path().join("errors.log").exists());
}
