//! Sheet contract: sheet names, header rows and the positional column layout
//! of the data sheet.

/// Name of the sheet that declares valid fields per tab
pub const GLOSSARY_SHEET: &str = "README-Glossary";
/// Name of the sheet under audit (also used as tab name inside the glossary)
pub const DATA_SHEET: &str = "Compute";
/// Zero-based header row of the glossary sheet (row 7 in Excel)
pub const GLOSSARY_HEADER_ROW: usize = 6;
/// Zero-based header row of the data sheet (row 6 in Excel)
pub const DATA_HEADER_ROW: usize = 5;
pub const TAB_NAME_COLUMN: &str = "Tab Name";
pub const COLUMN_NAME_COLUMN: &str = "Column Name";
/// Value of the separation scenario that marks a row as pending
pub const PENDING_SCENARIO: &str = "TBD";
/// Placeholder written for absent metadata values
pub const MISSING_VALUE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Sbg,
    Ban,
    ApplicationName,
    ServerId,
    SeparationScenario,
}

/// Ordered (role, position) pairs of the data sheet plus the candidate
/// target positions audited for blank values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub metadata: Vec<(ColumnRole, usize)>,
    pub targets: Vec<usize>,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        ColumnLayout {
            metadata: vec![
                (ColumnRole::Sbg, 2),
                (ColumnRole::Ban, 3),
                (ColumnRole::ApplicationName, 4),
                (ColumnRole::ServerId, 13),
                (ColumnRole::SeparationScenario, 17),
            ],
            targets: vec![18, 19, 20, 21, 22, 23],
        }
    }
}

impl ColumnLayout {
    /// Minimum number of columns the data sheet must expose
    pub fn required_width(&self) -> usize {
        self.metadata
            .iter()
            .map(|(_, position)| *position)
            .chain(self.targets.iter().copied())
            .max()
            .map_or(0, |max| max + 1)
    }

    pub fn position_of(&self, role: ColumnRole) -> Option<usize> {
        self.metadata
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, position)| *position)
    }

    /// Resolve the layout against a header row, keeping only the targets whose
    /// header text is accepted by `is_valid_target`.
    ///
    /// Returns `None` when the header is narrower than the layout or a metadata
    /// role is not declared.
    pub fn resolve<F>(&self, headers: &[String], is_valid_target: F) -> Option<ResolvedColumns>
    where
        F: Fn(&str) -> bool,
    {
        if headers.len() < self.required_width() {
            return None;
        }

        let targets = self
            .targets
            .iter()
            .filter(|position| is_valid_target(&headers[**position]))
            .map(|position| TargetColumn {
                name: headers[*position].clone(),
                position: *position,
            })
            .collect();

        Some(ResolvedColumns {
            sbg: self.position_of(ColumnRole::Sbg)?,
            ban: self.position_of(ColumnRole::Ban)?,
            application_name: self.position_of(ColumnRole::ApplicationName)?,
            server_id: self.position_of(ColumnRole::ServerId)?,
            separation_scenario: self.position_of(ColumnRole::SeparationScenario)?,
            targets,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetColumn {
    pub name: String,
    pub position: usize,
}

/// Column-access table produced once per invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub sbg: usize,
    pub ban: usize,
    pub application_name: usize,
    pub server_id: usize,
    pub separation_scenario: usize,
    pub targets: Vec<TargetColumn>,
}

/// Everything that locates data inside the input workbook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    pub glossary_sheet: String,
    pub data_sheet: String,
    pub glossary_header_row: usize,
    pub data_header_row: usize,
    pub columns: ColumnLayout,
}

impl Default for SheetLayout {
    fn default() -> Self {
        SheetLayout {
            glossary_sheet: GLOSSARY_SHEET.to_string(),
            data_sheet: DATA_SHEET.to_string(),
            glossary_header_row: GLOSSARY_HEADER_ROW,
            data_header_row: DATA_HEADER_ROW,
            columns: ColumnLayout::default(),
        }
    }
}
