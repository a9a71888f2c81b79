use calamine::Data;
use std::collections::HashSet;

use crate::error::ReportError;
use crate::layout::{MISSING_VALUE, PENDING_SCENARIO, ResolvedColumns, SheetLayout};
use crate::utils::normalize_scenario;
use crate::workbook::{SheetGrid, SourceWorkbook, cell_to_optional_string, cell_to_string, is_null};

/// A pending-scenario row with at least one blank target column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlaggedRecord {
    /// 1-based row number in the source sheet
    pub source_row: usize,
    pub ban: String,
    pub sbg: String,
    pub application_name: String,
    pub server_id: String,
    pub separation_scenario: String,
    /// Names of the blank target columns, in layout order
    pub missing_columns: Vec<String>,
}

impl FlaggedRecord {
    /// Missing column names joined with a newline, as written to the report
    pub fn columns_missing(&self) -> String {
        self.missing_columns.join("\n")
    }
}

#[derive(Debug, Clone)]
pub struct AuditedSheet {
    pub columns: ResolvedColumns,
    /// Number of rows whose separation scenario is pending
    pub pending_rows: usize,
    pub records: Vec<FlaggedRecord>,
}

/// Finds pending-scenario rows of the data sheet and the target columns they leave blank.
pub struct FieldAuditor<'a> {
    layout: &'a SheetLayout,
    valid_columns: &'a HashSet<String>,
}

impl<'a> FieldAuditor<'a> {
    pub fn new(layout: &'a SheetLayout, valid_columns: &'a HashSet<String>) -> Self {
        FieldAuditor {
            layout,
            valid_columns,
        }
    }

    pub fn audit_workbook(&self, workbook: &mut SourceWorkbook) -> Result<AuditedSheet, ReportError> {
        let grid = workbook
            .sheet(&self.layout.data_sheet)
            .map_err(|_| ReportError::UnreadableSheet {
                sheet: self.layout.data_sheet.clone(),
                header_row: self.layout.data_header_row + 1,
            })?;
        self.audit(grid)
    }

    pub fn audit(&self, grid: &SheetGrid) -> Result<AuditedSheet, ReportError> {
        let columns = self.resolve_columns(grid)?;
        if columns.targets.is_empty() {
            return Err(ReportError::NoValidTargetColumns);
        }

        let pending: Vec<usize> = grid
            .data_rows(self.layout.data_header_row)
            .filter(|row| Self::is_pending(grid.cell(*row, columns.separation_scenario)))
            .collect();
        if pending.is_empty() {
            return Err(ReportError::NoPendingRecords);
        }

        let records: Vec<FlaggedRecord> = pending
            .iter()
            .filter_map(|row| Self::flag_row(grid, *row, &columns))
            .collect();
        if records.is_empty() {
            return Err(ReportError::NoMissingData);
        }

        Ok(AuditedSheet {
            columns,
            pending_rows: pending.len(),
            records,
        })
    }

    fn resolve_columns(&self, grid: &SheetGrid) -> Result<ResolvedColumns, ReportError> {
        let header_row = self.layout.data_header_row;
        let headers = grid
            .header(header_row)
            .ok_or_else(|| ReportError::UnreadableSheet {
                sheet: self.layout.data_sheet.clone(),
                header_row: header_row + 1,
            })?;

        let expected = self.layout.columns.required_width();
        self.layout
            .columns
            .resolve(&headers, |name| self.valid_columns.contains(name))
            .ok_or_else(|| ReportError::InsufficientColumns {
                sheet: self.layout.data_sheet.clone(),
                expected,
                found: headers.len(),
            })
    }

    /// Whether a separation scenario cell reads `TBD` once trimmed and uppercased
    pub fn is_pending(cell: &Data) -> bool {
        normalize_scenario(&cell_to_string(cell)) == PENDING_SCENARIO
    }

    /// Whether a target cell is null or blank after trimming
    pub fn is_missing(cell: &Data) -> bool {
        is_null(cell) || cell_to_string(cell).trim().is_empty()
    }

    fn flag_row(grid: &SheetGrid, row: usize, columns: &ResolvedColumns) -> Option<FlaggedRecord> {
        let missing_columns: Vec<String> = columns
            .targets
            .iter()
            .filter(|target| Self::is_missing(grid.cell(row, target.position)))
            .map(|target| target.name.clone())
            .collect();

        if missing_columns.is_empty() {
            return None;
        }

        let value_at = |col: usize| {
            cell_to_optional_string(grid.cell(row, col)).unwrap_or_else(|| MISSING_VALUE.to_string())
        };

        Some(FlaggedRecord {
            source_row: row + 1,
            ban: value_at(columns.ban),
            sbg: value_at(columns.sbg),
            application_name: value_at(columns.application_name),
            server_id: value_at(columns.server_id),
            separation_scenario: value_at(columns.separation_scenario),
            missing_columns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pending_ignores_case_and_whitespace() {
        assert!(FieldAuditor::is_pending(&Data::String("tbd ".to_string())));
        assert!(FieldAuditor::is_pending(&Data::String("  TbD".to_string())));
        assert!(!FieldAuditor::is_pending(&Data::String("TBD later".to_string())));
        assert!(!FieldAuditor::is_pending(&Data::Empty));
    }

    #[test]
    fn test_is_missing() {
        assert!(FieldAuditor::is_missing(&Data::Empty));
        assert!(FieldAuditor::is_missing(&Data::String("   ".to_string())));
        assert!(FieldAuditor::is_missing(&Data::String("N/A".to_string())));
        assert!(!FieldAuditor::is_missing(&Data::Float(0.0)));
        assert!(!FieldAuditor::is_missing(&Data::String("x".to_string())));
    }

    #[test]
    fn test_columns_missing_has_no_trailing_separator() {
        let record = FlaggedRecord {
            source_row: 7,
            ban: "B1".to_string(),
            sbg: "S1".to_string(),
            application_name: "App".to_string(),
            server_id: "srv".to_string(),
            separation_scenario: "TBD".to_string(),
            missing_columns: vec!["Target 2".to_string(), "Target 5".to_string()],
        };
        assert_eq!(record.columns_missing(), "Target 2\nTarget 5");
    }
}
