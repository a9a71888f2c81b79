use crate::error::ReportError;
use crate::layout::{COLUMN_NAME_COLUMN, SheetLayout, TAB_NAME_COLUMN};
use crate::workbook::SourceWorkbook;

/// Gate that rejects workbooks not following the two-sheet contract.
///
/// Checks run in order and stop at the first failure:
/// 1. both sheets exist (exact name match)
/// 2. the glossary header row declares `Tab Name` and `Column Name`
/// 3. the data sheet header row is at least as wide as the column layout
pub struct SchemaValidator<'a> {
    layout: &'a SheetLayout,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(layout: &'a SheetLayout) -> Self {
        SchemaValidator { layout }
    }

    /// Parse the bytes and validate them. Used when only a yes/no answer is wanted.
    pub fn validate_bytes(&self, bytes: &[u8]) -> Result<(), ReportError> {
        let mut workbook = SourceWorkbook::open(bytes)
            .map_err(|e| ReportError::UnreadableWorkbook(e.to_string()))?;
        self.validate(&mut workbook)
    }

    pub fn validate(&self, workbook: &mut SourceWorkbook) -> Result<(), ReportError> {
        self.check_required_sheets(workbook)?;
        self.check_glossary_sheet(workbook)?;
        self.check_data_sheet(workbook)?;
        Ok(())
    }

    fn check_required_sheets(&self, workbook: &SourceWorkbook) -> Result<(), ReportError> {
        let missing_sheets: Vec<String> = [&self.layout.glossary_sheet, &self.layout.data_sheet]
            .into_iter()
            .filter(|sheet| !workbook.has_sheet(sheet))
            .cloned()
            .collect();

        if !missing_sheets.is_empty() {
            return Err(ReportError::MissingSheets(missing_sheets));
        }
        Ok(())
    }

    fn check_glossary_sheet(&self, workbook: &mut SourceWorkbook) -> Result<(), ReportError> {
        let sheet_name = &self.layout.glossary_sheet;
        let unreadable = || ReportError::UnreadableSheet {
            sheet: sheet_name.clone(),
            header_row: self.layout.glossary_header_row + 1,
        };

        let grid = workbook.sheet(sheet_name).map_err(|_| unreadable())?;
        let headers = grid
            .header(self.layout.glossary_header_row)
            .ok_or_else(unreadable)?;

        let missing_columns: Vec<String> = [TAB_NAME_COLUMN, COLUMN_NAME_COLUMN]
            .into_iter()
            .filter(|column| !headers.iter().any(|header| header == column))
            .map(str::to_string)
            .collect();

        if !missing_columns.is_empty() {
            return Err(ReportError::MissingColumns {
                sheet: sheet_name.clone(),
                columns: missing_columns,
            });
        }
        Ok(())
    }

    fn check_data_sheet(&self, workbook: &mut SourceWorkbook) -> Result<(), ReportError> {
        let sheet_name = &self.layout.data_sheet;
        let unreadable = || ReportError::UnreadableSheet {
            sheet: sheet_name.clone(),
            header_row: self.layout.data_header_row + 1,
        };

        let grid = workbook.sheet(sheet_name).map_err(|_| unreadable())?;
        let headers = grid
            .header(self.layout.data_header_row)
            .ok_or_else(unreadable)?;

        let expected = self.layout.columns.required_width();
        if headers.len() < expected {
            return Err(ReportError::InsufficientColumns {
                sheet: sheet_name.clone(),
                expected,
                found: headers.len(),
            });
        }
        Ok(())
    }
}
