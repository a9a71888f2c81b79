use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

use crate::auditor::FlaggedRecord;
use crate::formatter::ReportFormatter;
use crate::utils::write_error_to_log;

/// Fixed header of the report sheet
pub const REPORT_HEADERS: [&str; 7] = [
    "Business Application Number (BAN)",
    "Category",
    "SBG",
    "Business Application Name",
    "Server ID / Name",
    "Server-Level Separation Scenario",
    "Columns Missing",
];

/// One line of the report, in header order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub ban: String,
    pub category: String,
    pub sbg: String,
    pub application_name: String,
    pub server_id: String,
    pub separation_scenario: String,
    pub columns_missing: String,
}

impl ReportRow {
    pub fn from_record(record: &FlaggedRecord, category: &str) -> Self {
        ReportRow {
            ban: record.ban.clone(),
            category: category.to_string(),
            sbg: record.sbg.clone(),
            application_name: record.application_name.clone(),
            server_id: record.server_id.clone(),
            separation_scenario: record.separation_scenario.clone(),
            columns_missing: record.columns_missing(),
        }
    }

    pub fn values(&self) -> [&str; 7] {
        [
            self.ban.as_str(),
            self.category.as_str(),
            self.sbg.as_str(),
            self.application_name.as_str(),
            self.server_id.as_str(),
            self.separation_scenario.as_str(),
            self.columns_missing.as_str(),
        ]
    }
}

/// Turns flagged records into the single-sheet report workbook.
pub struct ReportBuilder {
    sheet_name: String,
    category: String,
}

impl ReportBuilder {
    pub fn new(sheet_name: &str, category: &str) -> Self {
        ReportBuilder {
            sheet_name: sheet_name.to_string(),
            category: category.to_string(),
        }
    }

    /// Map records to report rows. Order and multiplicity are preserved.
    pub fn rows(&self, records: &[FlaggedRecord]) -> Vec<ReportRow> {
        records
            .iter()
            .map(|record| ReportRow::from_record(record, &self.category))
            .collect()
    }

    /// Serialize the rows, styled by `formatter`.
    ///
    /// Styling is best effort: when the formatter fails, the failure is logged and
    /// the report is serialized again without any styling.
    pub fn serialize(
        &self,
        rows: &[ReportRow],
        formatter: &dyn ReportFormatter,
    ) -> Result<Vec<u8>, XlsxError> {
        let mut worksheet = self.write_worksheet(rows)?;

        match formatter.apply(&mut worksheet, rows) {
            Ok(()) => Self::save(worksheet),
            Err(e) => {
                write_error_to_log("Report Formatting Error", &e.to_string());
                eprintln!("❌ Error applying formatting: {e}");
                Self::save(self.write_worksheet(rows)?)
            }
        }
    }

    /// Serialize the rows without styling
    pub fn serialize_plain(&self, rows: &[ReportRow]) -> Result<Vec<u8>, XlsxError> {
        Self::save(self.write_worksheet(rows)?)
    }

    fn write_worksheet(&self, rows: &[ReportRow]) -> Result<Worksheet, XlsxError> {
        let mut worksheet = Worksheet::new();
        worksheet.set_name(&self.sheet_name)?;

        for (col, header) in REPORT_HEADERS.iter().enumerate() {
            worksheet.write_string(0, col as u16, *header)?;
        }

        for (index, row) in rows.iter().enumerate() {
            let excel_row = (index + 1) as u32;
            for (col, value) in row.values().iter().enumerate() {
                worksheet.write_string(excel_row, col as u16, *value)?;
            }
        }

        Ok(worksheet)
    }

    fn save(worksheet: Worksheet) -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        workbook.push_worksheet(worksheet);
        workbook.save_to_buffer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ban: &str, missing: &[&str]) -> FlaggedRecord {
        FlaggedRecord {
            source_row: 7,
            ban: ban.to_string(),
            sbg: "SBG-1".to_string(),
            application_name: "Billing".to_string(),
            server_id: "srv-01".to_string(),
            separation_scenario: "TBD".to_string(),
            missing_columns: missing.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn test_rows_keep_order_and_constant_category() {
        let builder = ReportBuilder::new("Compute", "Compute");
        let rows = builder.rows(&[record("B2", &["OS"]), record("B1", &["OS", "CPU"])]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].ban, "B2");
        assert_eq!(rows[1].ban, "B1");
        assert!(rows.iter().all(|row| row.category == "Compute"));
        assert_eq!(rows[1].columns_missing, "OS\nCPU");
    }

    #[test]
    fn test_values_follow_header_order() {
        let row = ReportRow::from_record(&record("B9", &["RAM"]), "Compute");
        assert_eq!(
            row.values(),
            ["B9", "Compute", "SBG-1", "Billing", "srv-01", "TBD", "RAM"]
        );
    }
}
