use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Worksheet, XlsxError};

use crate::layout::PENDING_SCENARIO;
use crate::report_builder::{REPORT_HEADERS, ReportRow};
use crate::utils::normalize_scenario;

/// Presentation step applied to the report sheet before it is serialized.
///
/// Implementations must only change presentation; cell values written by the
/// report builder stay as they are.
pub trait ReportFormatter {
    fn apply(&self, worksheet: &mut Worksheet, rows: &[ReportRow]) -> Result<(), XlsxError>;
}

pub const COLUMN_WIDTHS: [f64; 7] = [25.0, 12.0, 15.0, 35.0, 25.0, 30.0, 50.0];
pub const HEADER_HEIGHT: f64 = 40.0;
pub const MIN_ROW_HEIGHT: f64 = 30.0;
pub const LINE_HEIGHT: f64 = 15.0;

const FONT_NAME: &str = "Aptos";
const FONT_SIZE: f64 = 10.0;

const HEADER_FILL: u32 = 0x4472C4;
const LIGHT_FILL: u32 = 0xF2F2F2;
const WHITE_FILL: u32 = 0xFFFFFF;
const TBD_FILL: u32 = 0xFFF2CC;
const TBD_FONT: u32 = 0xC65911;
const MISSING_FILL: u32 = 0xFFE6E6;
const MISSING_FONT: u32 = 0xC00000;
const BORDER_COLOR: u32 = 0xD0D0D0;

const SCENARIO_COLUMN: usize = 5;
const MISSING_COLUMN: usize = 6;

/// Header styling, row banding, pending/missing highlights and a frozen header row
#[derive(Debug, Default, Clone, Copy)]
pub struct StyledReportFormatter;

impl StyledReportFormatter {
    /// Height of a data row, driven by the number of lines in "Columns Missing"
    pub fn row_height(columns_missing: &str) -> f64 {
        let line_count = if columns_missing.is_empty() {
            1
        } else {
            columns_missing.matches('\n').count() + 1
        };

        if line_count > 1 {
            (LINE_HEIGHT * line_count as f64).max(MIN_ROW_HEIGHT)
        } else {
            MIN_ROW_HEIGHT
        }
    }

    /// Banding fill for a 1-based Excel row number; even rows are shaded
    pub fn band_fill(excel_row: usize) -> Color {
        if excel_row % 2 == 0 {
            Color::RGB(LIGHT_FILL)
        } else {
            Color::RGB(WHITE_FILL)
        }
    }

    fn base_format() -> Format {
        Format::new()
            .set_font_name(FONT_NAME)
            .set_font_size(FONT_SIZE)
            .set_border(FormatBorder::Thin)
            .set_border_color(Color::RGB(BORDER_COLOR))
    }

    fn header_format() -> Format {
        Self::base_format()
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(HEADER_FILL))
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap()
    }

    fn centered_format(fill: Color) -> Format {
        Self::base_format()
            .set_background_color(fill)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
    }

    fn left_format(fill: Color) -> Format {
        Self::base_format()
            .set_background_color(fill)
            .set_align(FormatAlign::Left)
            .set_align(FormatAlign::Top)
            .set_text_wrap()
    }

    fn pending_format() -> Format {
        Self::base_format()
            .set_bold()
            .set_font_color(Color::RGB(TBD_FONT))
            .set_background_color(Color::RGB(TBD_FILL))
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
    }

    fn missing_format() -> Format {
        Self::base_format()
            .set_font_color(Color::RGB(MISSING_FONT))
            .set_background_color(Color::RGB(MISSING_FILL))
            .set_align(FormatAlign::Left)
            .set_align(FormatAlign::Top)
            .set_text_wrap()
    }
}

impl ReportFormatter for StyledReportFormatter {
    fn apply(&self, worksheet: &mut Worksheet, rows: &[ReportRow]) -> Result<(), XlsxError> {
        for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
            worksheet.set_column_width(col as u16, *width)?;
        }

        let header_format = Self::header_format();
        worksheet.set_row_height(0, HEADER_HEIGHT)?;
        for (col, header) in REPORT_HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }

        let pending_format = Self::pending_format();
        let missing_format = Self::missing_format();

        for (index, row) in rows.iter().enumerate() {
            let sheet_row = (index + 1) as u32;
            let fill = Self::band_fill(index + 2);
            let centered = Self::centered_format(fill);
            let left = Self::left_format(fill);

            for (col, value) in row.values().iter().enumerate() {
                let format = match col {
                    SCENARIO_COLUMN if normalize_scenario(value) == PENDING_SCENARIO => {
                        &pending_format
                    }
                    MISSING_COLUMN => &missing_format,
                    3 | 4 => &left,
                    _ => &centered,
                };
                worksheet.write_string_with_format(sheet_row, col as u16, *value, format)?;
            }

            worksheet.set_row_height(sheet_row, Self::row_height(&row.columns_missing))?;
        }

        worksheet.set_freeze_panes(1, 0)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_height_single_line_uses_minimum() {
        assert_eq!(StyledReportFormatter::row_height("OS"), 30.0);
        assert_eq!(StyledReportFormatter::row_height(""), 30.0);
    }

    #[test]
    fn test_row_height_grows_with_lines() {
        assert_eq!(StyledReportFormatter::row_height("A\nB"), 30.0);
        assert_eq!(StyledReportFormatter::row_height("A\nB\nC"), 45.0);
        assert_eq!(StyledReportFormatter::row_height("A\nB\nC\nD\nE\nF"), 90.0);
    }

    #[test]
    fn test_band_fill_alternates() {
        assert_eq!(StyledReportFormatter::band_fill(2), Color::RGB(LIGHT_FILL));
        assert_eq!(StyledReportFormatter::band_fill(3), Color::RGB(WHITE_FILL));
    }

    #[test]
    fn test_apply_styles_every_row() {
        let rows = vec![ReportRow {
            ban: "B1".to_string(),
            category: "Compute".to_string(),
            sbg: "S1".to_string(),
            application_name: "App".to_string(),
            server_id: "srv".to_string(),
            separation_scenario: "tbd".to_string(),
            columns_missing: "OS\nCPU\nRAM".to_string(),
        }];
        let mut worksheet = Worksheet::new();

        assert!(StyledReportFormatter.apply(&mut worksheet, &rows).is_ok());
    }
}
