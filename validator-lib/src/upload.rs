//! Contract shared with whatever transport carries uploads in and reports out.

use serde_json::json;
use std::path::Path;

use crate::error::{ErrorKind, ReportError};
use crate::statistics::ReportStatistics;

/// Multipart field carrying the uploaded workbook
pub const UPLOAD_FIELD: &str = "file";
pub const ALLOWED_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];
pub const REPORT_FILE_NAME: &str = "Compute_Validation_Report.xlsx";
pub const REPORT_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const STATS_HEADER: &str = "X-Report-Stats";

pub const NO_SELECTED_FILE: &str = "No selected file";
pub const INVALID_FORMAT: &str = "Invalid file format. Please upload an Excel file (.xlsx or .xls)";

/// Check an upload's file name before reading it.
///
/// Returns the user-facing rejection message when the name is empty or the
/// extension is not an accepted spreadsheet extension (case-insensitive).
pub fn check_file_name(file_name: &str) -> Result<(), &'static str> {
    if file_name.trim().is_empty() {
        return Err(NO_SELECTED_FILE);
    }

    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    match extension {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(INVALID_FORMAT),
    }
}

/// JSON body returned for a failed invocation
pub fn error_body(message: &str) -> String {
    json!({ "error": message }).to_string()
}

/// Status code a transport should answer with for `error`
pub fn status_code(error: &ReportError) -> u16 {
    match error.kind() {
        ErrorKind::Structural => 400,
        ErrorKind::NoData | ErrorKind::Internal => 500,
    }
}

/// Value of the stats header
pub fn stats_header_value(statistics: &ReportStatistics) -> serde_json::Result<String> {
    statistics.to_header_value()
}
