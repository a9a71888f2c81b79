#![allow(clippy::needless_return)]

mod auditor;
mod error;
mod formatter;
mod glossary;
mod layout;
mod pipeline;
mod report_builder;
mod schema_validator;
mod statistics;
mod workbook;
pub mod upload;
pub mod utils;
pub mod workspace;

// Test utilities - only compiled when testing or with test feature
// #[cfg(test)] alone doesn't work for integration tests (they're external crates)
// The feature flag makes it available to integration tests via dev-dependencies
#[cfg(any(test, feature = "test"))]
pub mod test_utils;

pub use auditor::{AuditedSheet, FieldAuditor, FlaggedRecord};
pub use error::{ErrorKind, ReportError};
pub use formatter::{ReportFormatter, StyledReportFormatter};
pub use glossary::GlossaryResolver;
pub use layout::{ColumnLayout, ColumnRole, ResolvedColumns, SheetLayout, TargetColumn};
pub use pipeline::{GeneratedReport, ReportGenerator, ReportGeneratorBuilder, ValidationOutcome};
pub use report_builder::{REPORT_HEADERS, ReportBuilder, ReportRow};
pub use schema_validator::SchemaValidator;
pub use statistics::{CategoryDetail, ReportStatistics, SbgBanDetail};
pub use workbook::{SheetGrid, SourceWorkbook, cell_to_string, is_null};

pub const ERRORS_LOG_FILE: &str = "errors.log";
