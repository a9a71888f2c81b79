// Test utilities available to both unit and integration tests
// Only compiled when testing

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::io::Cursor;

use crate::layout::{
    COLUMN_NAME_COLUMN, DATA_HEADER_ROW, DATA_SHEET, GLOSSARY_HEADER_ROW, GLOSSARY_SHEET,
    TAB_NAME_COLUMN,
};
use crate::workbook::cell_to_string;

/// Header names of the six audited columns (positions 18..=23)
pub const TARGET_HEADERS: [&str; 6] = [
    "Target OS",
    "Target CPU",
    "Target Memory",
    "Target Storage",
    "Target Network",
    "Target Hosting",
];

#[derive(Debug, Clone, PartialEq)]
pub enum FixtureCell {
    Text(String),
    Number(f64),
    /// Excel serial number shown with a `yyyy-mm-dd` number format
    Date(f64),
    Blank,
}

impl From<&str> for FixtureCell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            FixtureCell::Blank
        } else {
            FixtureCell::Text(value.to_string())
        }
    }
}

impl From<f64> for FixtureCell {
    fn from(value: f64) -> Self {
        FixtureCell::Number(value)
    }
}

/// The 24 data sheet headers with the metadata columns at their fixed positions
pub fn compute_headers() -> Vec<String> {
    (0..24)
        .map(|index| match index {
            0 => "Region".to_string(),
            1 => "Portfolio".to_string(),
            2 => "SBG".to_string(),
            3 => "BAN".to_string(),
            4 => "Business Application Name".to_string(),
            13 => "Server ID / Name".to_string(),
            17 => "Server-Level Separation Scenario".to_string(),
            18..=23 => TARGET_HEADERS[index - 18].to_string(),
            _ => format!("Attribute {index}"),
        })
        .collect()
}

/// A data row with metadata at the fixed positions; empty strings become blank cells
pub fn data_row(
    sbg: &str,
    ban: &str,
    application: &str,
    server: &str,
    scenario: &str,
    targets: [&str; 6],
) -> Vec<FixtureCell> {
    let mut row: Vec<FixtureCell> = (0..24).map(|_| FixtureCell::Blank).collect();
    row[0] = "EMEA".into();
    row[2] = sbg.into();
    row[3] = ban.into();
    row[4] = application.into();
    row[13] = server.into();
    row[17] = scenario.into();
    for (offset, target) in targets.iter().enumerate() {
        row[18 + offset] = (*target).into();
    }
    row
}

/// Builder for in-memory input workbooks following the two-sheet contract
#[derive(Debug, Clone)]
pub struct WorkbookFixture {
    glossary_headers: Vec<String>,
    glossary_entries: Vec<(String, String)>,
    data_headers: Vec<String>,
    data_rows: Vec<Vec<FixtureCell>>,
    skip_sheets: Vec<String>,
}

impl Default for WorkbookFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkbookFixture {
    /// Glossary declaring all six targets for the data sheet, no data rows
    pub fn new() -> Self {
        let mut glossary_entries: Vec<(String, String)> = TARGET_HEADERS
            .iter()
            .map(|header| (DATA_SHEET.to_string(), header.to_string()))
            .collect();
        glossary_entries.push(("Storage".to_string(), "Volume Size".to_string()));

        WorkbookFixture {
            glossary_headers: vec![
                TAB_NAME_COLUMN.to_string(),
                COLUMN_NAME_COLUMN.to_string(),
                "Description".to_string(),
            ],
            glossary_entries,
            data_headers: compute_headers(),
            data_rows: Vec::new(),
            skip_sheets: Vec::new(),
        }
    }

    pub fn glossary_headers(mut self, headers: &[&str]) -> Self {
        self.glossary_headers = headers.iter().map(|h| h.to_string()).collect();
        self
    }

    pub fn glossary_entries(mut self, entries: &[(&str, &str)]) -> Self {
        self.glossary_entries = entries
            .iter()
            .map(|(tab, column)| (tab.to_string(), column.to_string()))
            .collect();
        self
    }

    pub fn data_headers(mut self, headers: Vec<String>) -> Self {
        self.data_headers = headers;
        self
    }

    pub fn row(mut self, row: Vec<FixtureCell>) -> Self {
        self.data_rows.push(row);
        self
    }

    pub fn without_sheet(mut self, name: &str) -> Self {
        self.skip_sheets.push(name.to_string());
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut workbook = Workbook::new();

        if !self.skip_sheets.iter().any(|s| s == GLOSSARY_SHEET) {
            workbook.push_worksheet(self.glossary_sheet());
        }
        if !self.skip_sheets.iter().any(|s| s == DATA_SHEET) {
            workbook.push_worksheet(self.data_sheet());
        }
        let mut notes = Worksheet::new();
        notes.set_name("Notes").unwrap();
        notes.write_string(0, 0, "Generated for tests").unwrap();
        workbook.push_worksheet(notes);

        workbook.save_to_buffer().unwrap()
    }

    fn glossary_sheet(&self) -> Worksheet {
        let mut sheet = Worksheet::new();
        sheet.set_name(GLOSSARY_SHEET).unwrap();
        sheet.write_string(0, 0, "Combined Data File - Glossary").unwrap();

        let header_row = GLOSSARY_HEADER_ROW as u32;
        for (col, header) in self.glossary_headers.iter().enumerate() {
            sheet.write_string(header_row, col as u16, header).unwrap();
        }
        for (index, (tab, column)) in self.glossary_entries.iter().enumerate() {
            let row = header_row + 1 + index as u32;
            sheet.write_string(row, 0, tab).unwrap();
            sheet.write_string(row, 1, column).unwrap();
        }
        sheet
    }

    fn data_sheet(&self) -> Worksheet {
        let mut sheet = Worksheet::new();
        sheet.set_name(DATA_SHEET).unwrap();
        sheet.write_string(0, 0, "Compute Inventory").unwrap();

        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let header_row = DATA_HEADER_ROW as u32;
        for (col, header) in self.data_headers.iter().enumerate() {
            sheet.write_string(header_row, col as u16, header).unwrap();
        }
        for (index, cells) in self.data_rows.iter().enumerate() {
            let row = header_row + 1 + index as u32;
            for (col, cell) in cells.iter().enumerate() {
                match cell {
                    FixtureCell::Text(text) => {
                        sheet.write_string(row, col as u16, text).unwrap();
                    }
                    FixtureCell::Number(number) => {
                        sheet.write_number(row, col as u16, *number).unwrap();
                    }
                    FixtureCell::Date(serial) => {
                        sheet
                            .write_number_with_format(row, col as u16, *serial, &date_format)
                            .unwrap();
                    }
                    FixtureCell::Blank => {}
                }
            }
        }
        sheet
    }
}

/// Read a sheet of a workbook into stringified rows, starting at row 1
pub fn read_sheet(bytes: &[u8], sheet_name: &str) -> Vec<Vec<String>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).unwrap();
    let range = workbook.worksheet_range(sheet_name).unwrap();
    range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::Empty => String::new(),
                    other => cell_to_string(other),
                })
                .collect()
        })
        .collect()
}

/// Sheet names of a workbook
pub fn sheet_names(bytes: &[u8]) -> Vec<String> {
    open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .unwrap()
        .sheet_names()
}
