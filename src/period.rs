use crate::schema::{CellValue, PeriodKey};
use crate::utils::canonical_year;
use crate::workbook::{row_cell, Sheet, FIRST_DATA_COLUMN, MONTH_ROW, TYPE_ROW, YEAR_ROW};
use log::debug;
use std::collections::HashSet;

/// Period key of one data column, if all three header cells are present and
/// the year is numeric.
fn column_key(years: &[CellValue], months: &[CellValue], types: &[CellValue], col: usize) -> Option<PeriodKey> {
    let year = row_cell(years, col).and_then(canonical_year)?;
    let month = row_cell(months, col)?.as_text()?;
    let period_type = row_cell(types, col)?.as_text()?;
    Some(PeriodKey::new(year, month, period_type))
}

fn header_width(sheet: &Sheet) -> usize {
    [YEAR_ROW, MONTH_ROW, TYPE_ROW]
        .iter()
        .map(|&idx| sheet.header_row(idx).len())
        .max()
        .unwrap_or(0)
}

/// Finds the first data column whose header rows match `key`.
///
/// Years are compared after normalizing both sides to integers, so a header
/// year of `"2024"` matches `2024`. Month and type must match exactly.
pub fn locate_period_column(sheet: &Sheet, key: &PeriodKey) -> Option<usize> {
    let years = sheet.header_row(YEAR_ROW);
    let months = sheet.header_row(MONTH_ROW);
    let types = sheet.header_row(TYPE_ROW);

    let found = (FIRST_DATA_COLUMN..header_width(sheet)).find(|&col| {
        column_key(years, months, types, col).is_some_and(|candidate| candidate == *key)
    });

    debug!("Period {} located at column {:?}", key, found);
    found
}

pub fn locate_period_columns(sheet: &Sheet, keys: &[PeriodKey]) -> Vec<(PeriodKey, Option<usize>)> {
    keys.iter()
        .map(|key| (key.clone(), locate_period_column(sheet, key)))
        .collect()
}

/// Every distinct period a sheet carries, with the first column it appears in,
/// in column order.
pub fn available_periods(sheet: &Sheet) -> Vec<(usize, PeriodKey)> {
    let years = sheet.header_row(YEAR_ROW);
    let months = sheet.header_row(MONTH_ROW);
    let types = sheet.header_row(TYPE_ROW);

    let mut seen = HashSet::new();
    (FIRST_DATA_COLUMN..header_width(sheet))
        .filter_map(|col| column_key(years, months, types, col).map(|key| (col, key)))
        .filter(|(_, key)| seen.insert(key.clone()))
        .collect()
}
