use validator_lib::{GeneratedReport, ReportError, ReportGenerator};

// Re-export shared test utilities from src/test_utils.rs
pub use validator_lib::test_utils::{
    FixtureCell, TARGET_HEADERS, WorkbookFixture, compute_headers, data_row, read_sheet,
    sheet_names,
};

/// Run the default generator over a fixture
#[allow(dead_code)]
pub fn generate(fixture: &WorkbookFixture) -> Result<GeneratedReport, ReportError> {
    ReportGenerator::default().generate(&fixture.to_bytes())
}

/// Six populated target values
#[allow(dead_code)]
pub fn complete_targets() -> [&'static str; 6] {
    ["Linux", "4", "16GB", "200GB", "10Gb", "AWS"]
}

/// A fixture with one pending row missing "Target CPU" and one complete pending row
#[allow(dead_code)]
pub fn single_flagged_fixture() -> WorkbookFixture {
    WorkbookFixture::new()
        .row(data_row(
            "SBG-A",
            "BAN-001",
            "Billing",
            "srv-001",
            "TBD",
            ["Linux", "", "16GB", "200GB", "10Gb", "AWS"],
        ))
        .row(data_row(
            "SBG-A",
            "BAN-002",
            "Payroll",
            "srv-002",
            "TBD",
            complete_targets(),
        ))
}
