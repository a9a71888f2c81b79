use thiserror::Error;

/// Coarse classification of a [`ReportError`], used by callers to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The workbook does not follow the two-sheet contract.
    Structural,
    /// The workbook is well formed but has nothing to report.
    NoData,
    /// Anything unexpected (I/O, serialization).
    Internal,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReportError {
    #[error(
        "Unable to read the Excel file. Please ensure it's a valid Excel file (.xlsx or .xls). Error: {0}"
    )]
    UnreadableWorkbook(String),

    #[error(
        "Invalid file structure. Missing required sheet(s): {}. Please upload the correct Combined Data File.",
        .0.join(", ")
    )]
    MissingSheets(Vec<String>),

    #[error(
        "Invalid '{sheet}' sheet structure. Missing column(s): {}. Please upload the correct file.",
        .columns.join(", ")
    )]
    MissingColumns { sheet: String, columns: Vec<String> },

    #[error(
        "Error reading '{sheet}' sheet. Please ensure the file format is correct. Header should be at row {header_row}."
    )]
    UnreadableSheet { sheet: String, header_row: usize },

    #[error(
        "Invalid '{sheet}' sheet structure. Expected at least {expected} columns, found {found}. Please upload the correct file."
    )]
    InsufficientColumns {
        sheet: String,
        expected: usize,
        found: usize,
    },

    #[error("No valid target columns found in glossary.")]
    NoValidTargetColumns,

    #[error("No records found with 'TBD' in Server-Level Separation Scenario.")]
    NoPendingRecords,

    #[error("No records found with missing data in target columns.")]
    NoMissingData,

    #[error("{0}")]
    Internal(String),
}

impl ReportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReportError::UnreadableWorkbook(_)
            | ReportError::MissingSheets(_)
            | ReportError::MissingColumns { .. }
            | ReportError::UnreadableSheet { .. }
            | ReportError::InsufficientColumns { .. } => ErrorKind::Structural,
            ReportError::NoValidTargetColumns
            | ReportError::NoPendingRecords
            | ReportError::NoMissingData => ErrorKind::NoData,
            ReportError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn is_structural(&self) -> bool {
        self.kind() == ErrorKind::Structural
    }
}

impl From<rust_xlsxwriter::XlsxError> for ReportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ReportError::Internal(err.to_string())
    }
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        ReportError::Internal(err.to_string())
    }
}
