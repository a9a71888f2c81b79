use calamine::{Data, Range, Reader, Sheets, open_workbook_auto_from_rs};
use std::collections::HashMap;
use std::io::Cursor;

use crate::utils::is_na_marker;

static EMPTY_CELL: Data = Data::Empty;

/// The input workbook, parsed once per invocation.
///
/// Sheets are read lazily and cached, so the schema check and the later
/// processing steps share a single parse of every sheet they touch.
pub struct SourceWorkbook {
    reader: Sheets<Cursor<Vec<u8>>>,
    sheet_names: Vec<String>,
    loaded: HashMap<String, SheetGrid>,
}

impl SourceWorkbook {
    /// Open a workbook from raw bytes. The container format (xlsx, xlsb, xls, ods)
    /// is detected from the content.
    pub fn open(bytes: &[u8]) -> Result<Self, calamine::Error> {
        let reader = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
        let sheet_names = reader.sheet_names();
        Ok(SourceWorkbook {
            reader,
            sheet_names,
            loaded: HashMap::new(),
        })
    }

    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheet_names.iter().any(|sheet| sheet == name)
    }

    pub fn sheet(&mut self, name: &str) -> Result<&SheetGrid, calamine::Error> {
        if !self.loaded.contains_key(name) {
            let range = self.reader.worksheet_range(name)?;
            self.loaded
                .insert(name.to_string(), SheetGrid::new(name, range));
        }
        Ok(&self.loaded[name])
    }
}

/// A worksheet addressed by absolute, zero-based (row, column) positions,
/// the same coordinates Excel shows (row 0 is Excel row 1).
pub struct SheetGrid {
    name: String,
    range: Range<Data>,
}

impl SheetGrid {
    pub fn new(name: &str, range: Range<Data>) -> Self {
        SheetGrid {
            name: name.to_string(),
            range,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of columns from column A to the right-most used column
    pub fn width(&self) -> usize {
        self.range.end().map_or(0, |(_, col)| col as usize + 1)
    }

    /// Number of rows from row 1 to the last used row
    pub fn height(&self) -> usize {
        self.range.end().map_or(0, |(row, _)| row as usize + 1)
    }

    pub fn cell(&self, row: usize, col: usize) -> &Data {
        self.range
            .get_value((row as u32, col as u32))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Header names of `row`, or `None` if the sheet ends before that row.
    ///
    /// Names are stringified and trimmed without NA handling; blank headers become
    /// `Unnamed: <index>` and repeated names get a `.1`, `.2`, ... suffix.
    pub fn header(&self, row: usize) -> Option<Vec<String>> {
        if row >= self.height() {
            return None;
        }

        let names = (0..self.width()).map(|col| {
            let text = header_text(self.cell(row, col));
            if text.is_empty() {
                format!("Unnamed: {col}")
            } else {
                text
            }
        });
        Some(deduplicate_names(names))
    }

    /// Zero-based row indices of every row below `header_row`
    pub fn data_rows(&self, header_row: usize) -> std::ops::Range<usize> {
        (header_row + 1)..self.height().max(header_row + 1)
    }
}

/// A cell counts as null when it is empty, an error value or an NA marker.
pub fn is_null(cell: &Data) -> bool {
    match cell {
        Data::Empty | Data::Error(_) => true,
        Data::String(s) => is_na_marker(s),
        _ => false,
    }
}

/// Text of a cell as it is compared and reported. Null cells read as `nan`.
pub fn cell_to_string(cell: &Data) -> String {
    if is_null(cell) {
        return "nan".to_string();
    }

    match cell {
        Data::String(s) => s.clone(),
        Data::Float(f) => format_number(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::DateTime(dt) => format_excel_datetime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Empty | Data::Error(_) => "nan".to_string(),
    }
}

/// Same as [`cell_to_string`] but `None` for null cells
pub fn cell_to_optional_string(cell: &Data) -> Option<String> {
    if is_null(cell) {
        None
    } else {
        Some(cell_to_string(cell))
    }
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Error(e) => e.to_string(),
        other => cell_to_string(other).trim().to_string(),
    }
}

/// Suffix repeated names with `.1`, `.2`, ... skipping names already taken.
fn deduplicate_names(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut unique = Vec::new();

    for name in names {
        let mut name = name;
        let mut count = counts.get(&name).copied().unwrap_or(0);
        while count > 0 {
            counts.insert(name.clone(), count + 1);
            name = format!("{name}.{count}");
            count = counts.get(&name).copied().unwrap_or(0);
        }
        counts.insert(name.clone(), count + 1);
        unique.push(name);
    }

    unique
}

fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    value.to_string()
}

/// Serial dates outside chrono's range fall back to the plain number.
fn format_excel_datetime(value: f64) -> String {
    use chrono::{NaiveDate, TimeDelta};

    if !value.is_finite() {
        return format_number(value);
    }
    let Some(excel_base) = NaiveDate::from_ymd_opt(1899, 12, 30).and_then(|d| d.and_hms_opt(0, 0, 0))
    else {
        return format_number(value);
    };
    let days = value.trunc() as i64;
    let seconds = ((value - days as f64) * 86400.0).round() as i64;
    let datetime = TimeDelta::try_days(days)
        .zip(TimeDelta::try_seconds(seconds))
        .and_then(|(days, seconds)| days.checked_add(&seconds))
        .and_then(|offset| excel_base.checked_add_signed(offset));
    let Some(datetime) = datetime else {
        return format_number(value);
    };

    if seconds == 0 {
        datetime.format("%Y-%m-%d").to_string()
    } else {
        datetime.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;

    #[test]
    fn test_null_cells() {
        assert!(is_null(&Data::Empty));
        assert!(is_null(&Data::Error(CellErrorType::NA)));
        assert!(is_null(&Data::String("N/A".to_string())));
        assert!(is_null(&Data::String(String::new())));
        assert!(!is_null(&Data::String("   ".to_string())));
        assert!(!is_null(&Data::Float(0.0)));
    }

    #[test]
    fn test_cell_to_string_numbers() {
        assert_eq!(cell_to_string(&Data::Float(1234.0)), "1234");
        assert_eq!(cell_to_string(&Data::Float(12.5)), "12.5");
        assert_eq!(cell_to_string(&Data::Int(-7)), "-7");
        assert_eq!(cell_to_string(&Data::Bool(true)), "True");
        assert_eq!(cell_to_string(&Data::Empty), "nan");
    }

    #[test]
    fn test_format_excel_datetime() {
        assert_eq!(format_excel_datetime(45000.0), "2023-03-15");
        assert_eq!(format_excel_datetime(45000.5), "2023-03-15 12:00:00");
    }

    #[test]
    fn test_format_excel_datetime_out_of_range() {
        assert_eq!(format_excel_datetime(1.0e10), "10000000000");
        assert_eq!(format_excel_datetime(-1.0e10), "-10000000000");
        assert_eq!(format_excel_datetime(f64::NAN), "NaN");
    }

    fn header_grid(cells: Vec<Data>) -> SheetGrid {
        let mut range = Range::new((0, 0), (0, cells.len() as u32 - 1));
        for (col, cell) in cells.into_iter().enumerate() {
            range.set_value((0, col as u32), cell);
        }
        SheetGrid::new("Headers", range)
    }

    #[test]
    fn test_header_keeps_na_text_and_names_blanks() {
        let grid = header_grid(vec![
            Data::String("N/A".to_string()),
            Data::Empty,
            Data::String("  ".to_string()),
            Data::Error(CellErrorType::NA),
            Data::Float(2024.0),
        ]);

        assert_eq!(
            grid.header(0).unwrap(),
            vec!["N/A", "Unnamed: 1", "Unnamed: 2", "#N/A", "2024"]
        );
        assert!(grid.header(1).is_none());
    }

    #[test]
    fn test_header_deduplicates_repeated_names() {
        let grid = header_grid(vec![
            Data::String("Target OS".to_string()),
            Data::String("Target OS".to_string()),
            Data::String("Target OS.1".to_string()),
            Data::String(" Target OS ".to_string()),
        ]);

        assert_eq!(
            grid.header(0).unwrap(),
            vec!["Target OS", "Target OS.1", "Target OS.1.1", "Target OS.2"]
        );
    }
}
