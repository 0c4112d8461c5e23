use crate::schema::CellValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const YEAR_ROW: usize = 0;
pub const MONTH_ROW: usize = 1;
pub const TYPE_ROW: usize = 2;
pub const FIRST_DATA_ROW: usize = 3;
pub const FIRST_DATA_COLUMN: usize = 5;

pub type Row = Vec<CellValue>;

/// Returns the cell at `col`, treating both short rows and empty cells as absent.
pub fn row_cell(row: &[CellValue], col: usize) -> Option<&CellValue> {
    row.get(col).filter(|cell| !cell.is_empty())
}

/// One tabular page of a workbook.
///
/// Rows 0 to 2 carry the year, month and period type of every data column;
/// the remaining rows are ledger lines. Rows are not required to share a width.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sheet {
    rows: Vec<Row>,
}

impl Sheet {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[CellValue]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.row(row).and_then(|r| row_cell(r, col))
    }

    /// Header row `index` (0 = years, 1 = months, 2 = types), empty if the sheet is too short.
    pub fn header_row(&self, index: usize) -> &[CellValue] {
        debug_assert!(index < FIRST_DATA_ROW);
        self.row(index).unwrap_or(&[])
    }

    pub fn data_rows(&self) -> &[Row] {
        self.rows.get(FIRST_DATA_ROW..).unwrap_or(&[])
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Sheet name mapped to sheet, as produced by the spreadsheet parsing layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Workbook {
    sheets: BTreeMap<String, Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, sheet: Sheet) -> Option<Sheet> {
        self.sheets.insert(name.into(), sheet)
    }

    pub fn with_sheet(mut self, name: impl Into<String>, sheet: Sheet) -> Self {
        self.insert(name, sheet);
        self
    }

    /// Looks up a sheet by exact name. A missing sheet is `None`, never an error.
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.get(name)
    }

    /// Like [`Workbook::sheet`], also returning the stored name.
    pub fn sheet_entry(&self, name: &str) -> Option<(&str, &Sheet)> {
        self.sheets
            .get_key_value(name)
            .map(|(key, sheet)| (key.as_str(), sheet))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sheets.contains_key(name)
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

impl FromIterator<(String, Sheet)> for Workbook {
    fn from_iter<I: IntoIterator<Item = (String, Sheet)>>(iter: I) -> Self {
        Self {
            sheets: iter.into_iter().collect(),
        }
    }
}
