use anyhow::Result;
use std::path::Path;

use crate::auditor::FieldAuditor;
use crate::error::ReportError;
use crate::formatter::{ReportFormatter, StyledReportFormatter};
use crate::glossary::GlossaryResolver;
use crate::layout::{ColumnLayout, DATA_SHEET, SheetLayout};
use crate::report_builder::{ReportBuilder, ReportRow};
use crate::schema_validator::SchemaValidator;
use crate::statistics::ReportStatistics;
use crate::workbook::SourceWorkbook;

/// Result of a successful invocation
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub message: String,
    pub report: Vec<u8>,
    pub rows: Vec<ReportRow>,
    pub statistics: ReportStatistics,
}

/// Flattened result handed to transports: success flag, message, statistics
/// and the report bytes when successful.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub success: bool,
    pub message: String,
    pub statistics: Option<ReportStatistics>,
    pub report: Option<Vec<u8>>,
    pub error: Option<ReportError>,
}

impl From<Result<GeneratedReport, ReportError>> for ValidationOutcome {
    fn from(result: Result<GeneratedReport, ReportError>) -> Self {
        match result {
            Ok(generated) => ValidationOutcome {
                success: true,
                message: generated.message,
                statistics: Some(generated.statistics),
                report: Some(generated.report),
                error: None,
            },
            Err(e) => ValidationOutcome {
                success: false,
                message: e.to_string(),
                statistics: None,
                report: None,
                error: Some(e),
            },
        }
    }
}

pub struct ReportGeneratorBuilder {
    layout: SheetLayout,
    category: String,
    formatter: Box<dyn ReportFormatter>,
}

impl Default for ReportGeneratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGeneratorBuilder {
    /// Create a builder with the standard two-sheet contract
    pub fn new() -> Self {
        ReportGeneratorBuilder {
            layout: SheetLayout::default(),
            category: DATA_SHEET.to_string(),
            formatter: Box::new(StyledReportFormatter),
        }
    }

    pub fn glossary_sheet(mut self, name: &str) -> Self {
        self.layout.glossary_sheet = name.to_string();
        self
    }

    /// Name of the audited sheet; also the tab name looked up in the glossary
    /// and the name of the report sheet.
    pub fn data_sheet(mut self, name: &str) -> Self {
        self.layout.data_sheet = name.to_string();
        self
    }

    /// Zero-based header rows of the glossary and data sheets
    pub fn header_rows(mut self, glossary_header_row: usize, data_header_row: usize) -> Self {
        self.layout.glossary_header_row = glossary_header_row;
        self.layout.data_header_row = data_header_row;
        self
    }

    pub fn columns(mut self, columns: ColumnLayout) -> Self {
        self.layout.columns = columns;
        self
    }

    /// Constant written to the "Category" column
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn formatter(mut self, formatter: Box<dyn ReportFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn build(self) -> ReportGenerator {
        ReportGenerator {
            layout: self.layout,
            category: self.category,
            formatter: self.formatter,
        }
    }
}

/// Runs validation, auditing, report building and statistics over one workbook.
///
/// A generator holds configuration only; every call works on its own copy of
/// the input and keeps nothing afterwards.
pub struct ReportGenerator {
    layout: SheetLayout,
    category: String,
    formatter: Box<dyn ReportFormatter>,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        ReportGeneratorBuilder::new().build()
    }
}

impl ReportGenerator {
    //////////////////////////////////////////////////////////////
    ///  Public API
    //////////////////////////////////////////////////////////////

    pub fn builder() -> ReportGeneratorBuilder {
        ReportGeneratorBuilder::new()
    }

    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    pub fn generate(&self, bytes: &[u8]) -> Result<GeneratedReport, ReportError> {
        let mut workbook = SourceWorkbook::open(bytes)
            .map_err(|e| ReportError::UnreadableWorkbook(e.to_string()))?;

        SchemaValidator::new(&self.layout).validate(&mut workbook)?;

        let valid_columns = GlossaryResolver::new(&self.layout).valid_columns(&mut workbook)?;
        let audited =
            FieldAuditor::new(&self.layout, &valid_columns).audit_workbook(&mut workbook)?;

        let builder = ReportBuilder::new(&self.layout.data_sheet, &self.category);
        let rows = builder.rows(&audited.records);
        let report = builder.serialize(&rows, self.formatter.as_ref())?;
        let statistics = ReportStatistics::from_rows(&rows);

        Ok(GeneratedReport {
            message: format!("Generated {} records.", rows.len()),
            report,
            rows,
            statistics,
        })
    }

    /// Read the workbook at `path` and generate the report
    pub fn generate_from_path(&self, path: impl AsRef<Path>) -> Result<GeneratedReport> {
        let bytes = std::fs::read(path.as_ref())?;
        Ok(self.generate(&bytes)?)
    }

    /// Outermost boundary: never fails, every error becomes a failure outcome.
    pub fn run(&self, bytes: &[u8]) -> ValidationOutcome {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| self.generate(bytes)))
            .unwrap_or_else(|panic| Err(ReportError::Internal(panic_message(panic.as_ref()))));
        ValidationOutcome::from(result)
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "Unexpected internal error".to_string()
    }
}
