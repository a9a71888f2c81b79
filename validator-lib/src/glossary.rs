use std::collections::HashSet;

use crate::error::ReportError;
use crate::layout::{COLUMN_NAME_COLUMN, SheetLayout, TAB_NAME_COLUMN};
use crate::utils::trim_text;
use crate::workbook::{SourceWorkbook, cell_to_string};

/// Reads the glossary sheet and answers which column names are declared for a tab.
pub struct GlossaryResolver<'a> {
    layout: &'a SheetLayout,
}

impl<'a> GlossaryResolver<'a> {
    pub fn new(layout: &'a SheetLayout) -> Self {
        GlossaryResolver { layout }
    }

    /// Set of trimmed column names whose trimmed tab name equals the data sheet name.
    ///
    /// Matching is exact after trimming; no case folding.
    pub fn valid_columns(&self, workbook: &mut SourceWorkbook) -> Result<HashSet<String>, ReportError> {
        let entries = self.entries(workbook)?;
        let data_sheet = self.layout.data_sheet.as_str();

        Ok(entries
            .into_iter()
            .filter(|(tab_name, _)| tab_name == data_sheet)
            .map(|(_, column_name)| column_name)
            .collect())
    }

    /// All (tab name, column name) pairs below the glossary header, trimmed
    pub fn entries(&self, workbook: &mut SourceWorkbook) -> Result<Vec<(String, String)>, ReportError> {
        let header_row = self.layout.glossary_header_row;
        let unreadable = || ReportError::UnreadableSheet {
            sheet: self.layout.glossary_sheet.clone(),
            header_row: header_row + 1,
        };

        let grid = workbook
            .sheet(&self.layout.glossary_sheet)
            .map_err(|_| unreadable())?;
        let headers = grid.header(header_row).ok_or_else(unreadable)?;

        let column_of = |name: &str| -> Result<usize, ReportError> {
            headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| ReportError::MissingColumns {
                    sheet: self.layout.glossary_sheet.clone(),
                    columns: vec![name.to_string()],
                })
        };
        let tab_col = column_of(TAB_NAME_COLUMN)?;
        let name_col = column_of(COLUMN_NAME_COLUMN)?;

        let entries = grid
            .data_rows(header_row)
            .map(|row| {
                (
                    trim_text(&cell_to_string(grid.cell(row, tab_col))),
                    trim_text(&cell_to_string(grid.cell(row, name_col))),
                )
            })
            .collect();

        Ok(entries)
    }
}
