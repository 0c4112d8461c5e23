use crate::error::{LedgerError, Result};
use crate::schema::CellValue;
use crate::workbook::{Row, Sheet, Workbook};
use log::debug;
use serde_json::Value;

/// Builds a workbook from a JSON document of the form
/// `{ "<sheet name>": [[cell, ...], ...], ... }`, where every cell is `null`,
/// a number or a string.
pub fn workbook_from_json_str(json: &str) -> Result<Workbook> {
    let value: Value = serde_json::from_str(json)?;
    workbook_from_json_value(&value)
}

pub fn workbook_from_json_value(value: &Value) -> Result<Workbook> {
    let sheets = value.as_object().ok_or_else(|| {
        LedgerError::MalformedWorkbook(format!(
            "expected an object of sheet name to rows, found {}",
            json_kind(value)
        ))
    })?;

    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let sheet = sheet_from_json_value(name, rows)?;
        debug!("Ingested sheet '{}' with {} rows", name, sheet.height());
        workbook.insert(name.clone(), sheet);
    }

    Ok(workbook)
}

/// Converts one sheet's JSON rows, failing on anything that is not an array
/// of arrays of scalar cells.
pub fn sheet_from_json_value(name: &str, value: &Value) -> Result<Sheet> {
    let malformed = |details: String| LedgerError::MalformedSheet {
        sheet: name.to_string(),
        details,
    };

    let rows = value.as_array().ok_or_else(|| {
        malformed(format!("expected an array of rows, found {}", json_kind(value)))
    })?;

    let mut converted: Vec<Row> = Vec::with_capacity(rows.len());
    for (row_idx, row) in rows.iter().enumerate() {
        let cells = row.as_array().ok_or_else(|| {
            malformed(format!(
                "row {} is {}, expected an array of cells",
                row_idx,
                json_kind(row)
            ))
        })?;

        let mut converted_row = Vec::with_capacity(cells.len());
        for (col_idx, cell) in cells.iter().enumerate() {
            let cell = match cell {
                Value::Null => CellValue::Empty,
                Value::String(s) => CellValue::Text(s.clone()),
                Value::Number(n) => match n.as_f64() {
                    Some(f) => CellValue::Number(f),
                    None => {
                        return Err(malformed(format!(
                            "cell ({}, {}) holds a number outside the f64 range",
                            row_idx, col_idx
                        )))
                    }
                },
                other => {
                    return Err(malformed(format!(
                        "cell ({}, {}) is {}, expected null, a number or a string",
                        row_idx,
                        col_idx,
                        json_kind(other)
                    )))
                }
            };
            converted_row.push(cell);
        }
        converted.push(converted_row);
    }

    Ok(Sheet::new(converted))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(feature = "xlsx")]
pub use self::xlsx::{cell_from_data, load_xlsx, sheet_from_range};

#[cfg(feature = "xlsx")]
mod xlsx {
    use super::*;
    use calamine::{open_workbook_auto, Data, Range, Reader};
    use std::path::Path;

    /// Reads every worksheet of an `.xlsx`/`.xls`/`.ods` file.
    pub fn load_xlsx(path: impl AsRef<Path>) -> Result<Workbook> {
        let path = path.as_ref();
        let mut sheets = open_workbook_auto(path)?;
        let names: Vec<String> = sheets.sheet_names().to_vec();
        debug!("Opened {} with {} sheets", path.display(), names.len());

        let mut workbook = Workbook::new();
        for name in names {
            let range = sheets.worksheet_range(&name)?;
            workbook.insert(name, sheet_from_range(&range));
        }

        Ok(workbook)
    }

    /// Converts a calamine range into a sheet anchored at A1.
    ///
    /// calamine trims leading empty rows and columns from a range, so they are
    /// padded back to keep header rows and column indices where the file has them.
    pub fn sheet_from_range(range: &Range<Data>) -> Sheet {
        let (row_offset, col_offset) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let mut rows: Vec<Row> = vec![Vec::new(); row_offset];
        for row in range.rows() {
            let mut cells = vec![CellValue::Empty; col_offset];
            cells.extend(row.iter().map(cell_from_data));
            while cells.last().is_some_and(CellValue::is_empty) {
                cells.pop();
            }
            rows.push(cells);
        }

        Sheet::new(rows)
    }

    pub fn cell_from_data(data: &Data) -> CellValue {
        match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Text(b.to_string()),
            Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(_) => CellValue::Empty,
        }
    }

}
