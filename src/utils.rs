use crate::schema::CellValue;
use chrono::Month;
use std::fmt;

/// Coerces a cell into a finite number.
///
/// Numbers pass through, numeric strings are parsed after trimming. Empty
/// cells, blank strings, text that is not a number, NaN and infinities all
/// yield `None`.
pub fn parse_numeric(cell: &CellValue) -> Option<f64> {
    let value = match cell {
        CellValue::Number(n) => *n,
        CellValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        CellValue::Empty => return None,
    };

    value.is_finite().then_some(value)
}

/// Normalizes a year header cell to its canonical integer form.
///
/// Accepts `2024`, `2024.0`, `"2024"` and `" 2024 "`. Fractional years and
/// anything non-numeric are rejected.
pub fn canonical_year(cell: &CellValue) -> Option<i32> {
    let value = parse_numeric(cell)?;
    if value.fract() != 0.0 || value < i32::MIN as f64 || value > i32::MAX as f64 {
        return None;
    }
    Some(value as i32)
}

/// Renders a cell as a label, e.g. for product group or entity columns.
///
/// Text is returned as written; integral numbers drop their fraction so a
/// product code of `100.0` reads as "100". Empty text and empty cells have no
/// label.
pub fn cell_label(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Text(s) if !s.is_empty() => Some(s.clone()),
        CellValue::Number(n) if n.is_finite() && n.fract() == 0.0 => Some(format!("{:.0}", n)),
        CellValue::Number(n) if n.is_finite() => Some(n.to_string()),
        _ => None,
    }
}

/// The kind of period a month header denotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodLabel {
    Month(Month),
    Quarter(u8),
    HalfYear(u8),
    FullYear,
    Other(String),
}

impl PeriodLabel {
    pub fn is_month(&self) -> bool {
        matches!(self, Self::Month(_))
    }

    /// Calendar months covered by this label, 1-based. Unknown labels cover none.
    pub fn months(&self) -> Vec<u32> {
        match self {
            Self::Month(m) => vec![m.number_from_month()],
            Self::Quarter(q) => {
                let start = (*q as u32 - 1) * 3 + 1;
                (start..start + 3).collect()
            }
            Self::HalfYear(h) => {
                let start = (*h as u32 - 1) * 6 + 1;
                (start..start + 6).collect()
            }
            Self::FullYear => (1..=12).collect(),
            Self::Other(_) => Vec::new(),
        }
    }
}

impl fmt::Display for PeriodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Month(m) => write!(f, "{}", m.name()),
            Self::Quarter(q) => write!(f, "Q{}", q),
            Self::HalfYear(h) => write!(f, "HY{}", h),
            Self::FullYear => write!(f, "FY"),
            Self::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Classifies a month header such as "January", "Jan", "Q3", "HY1" or "Year".
pub fn classify_period_label(label: &str) -> PeriodLabel {
    let trimmed = label.trim();
    let upper = trimmed.to_ascii_uppercase();

    if let Some(n) = upper.strip_prefix("HY").or_else(|| upper.strip_prefix('H')) {
        if let Ok(h @ 1..=2) = n.parse::<u8>() {
            return PeriodLabel::HalfYear(h);
        }
    }

    if let Some(n) = upper.strip_prefix('Q') {
        if let Ok(q @ 1..=4) = n.parse::<u8>() {
            return PeriodLabel::Quarter(q);
        }
    }

    if matches!(upper.as_str(), "YEAR" | "FY" | "FULL YEAR" | "YTD") {
        return PeriodLabel::FullYear;
    }

    match trimmed.parse::<Month>() {
        Ok(month) => PeriodLabel::Month(month),
        Err(_) => PeriodLabel::Other(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric(&CellValue::Number(5.0)), Some(5.0));
        assert_eq!(parse_numeric(&CellValue::text(" 12.5 ")), Some(12.5));
        assert_eq!(parse_numeric(&CellValue::text("-3")), Some(-3.0));
        assert_eq!(parse_numeric(&CellValue::text("abc")), None);
        assert_eq!(parse_numeric(&CellValue::text("")), None);
        assert_eq!(parse_numeric(&CellValue::Empty), None);
        assert_eq!(parse_numeric(&CellValue::Number(f64::NAN)), None);
        assert_eq!(parse_numeric(&CellValue::text("inf")), None);
    }

    #[test]
    fn test_canonical_year_accepts_numbers_and_strings() {
        assert_eq!(canonical_year(&CellValue::Number(2024.0)), Some(2024));
        assert_eq!(canonical_year(&CellValue::text("2024")), Some(2024));
        assert_eq!(canonical_year(&CellValue::text(" 2023 ")), Some(2023));
        assert_eq!(canonical_year(&CellValue::Number(2024.5)), None);
        assert_eq!(canonical_year(&CellValue::text("FY24")), None);
        assert_eq!(canonical_year(&CellValue::Empty), None);
    }

    #[test]
    fn test_cell_label() {
        assert_eq!(cell_label(&CellValue::text("PG-1")), Some("PG-1".to_string()));
        assert_eq!(cell_label(&CellValue::Number(100.0)), Some("100".to_string()));
        assert_eq!(cell_label(&CellValue::text("")), None);
        assert_eq!(cell_label(&CellValue::Empty), None);
    }

    #[test]
    fn test_cell_label_keeps_large_codes_distinct() {
        assert_eq!(
            cell_label(&CellValue::Number(1e20)),
            Some("100000000000000000000".to_string())
        );
        assert_ne!(
            cell_label(&CellValue::Number(1e20)),
            cell_label(&CellValue::Number(2e20))
        );
        assert_eq!(cell_label(&CellValue::Number(-42.0)), Some("-42".to_string()));
    }

    #[test]
    fn test_cell_label_keeps_whitespace_text() {
        assert_eq!(cell_label(&CellValue::text("   ")), Some("   ".to_string()));
    }

    #[test]
    fn test_classify_period_label() {
        assert_eq!(classify_period_label("January"), PeriodLabel::Month(Month::January));
        assert_eq!(classify_period_label("jan"), PeriodLabel::Month(Month::January));
        assert_eq!(classify_period_label("Q1"), PeriodLabel::Quarter(1));
        assert_eq!(classify_period_label("HY2"), PeriodLabel::HalfYear(2));
        assert_eq!(classify_period_label("Year"), PeriodLabel::FullYear);
        assert_eq!(
            classify_period_label("Q5"),
            PeriodLabel::Other("Q5".to_string())
        );
    }

    #[test]
    fn test_period_label_months() {
        assert_eq!(PeriodLabel::Quarter(2).months(), vec![4, 5, 6]);
        assert_eq!(PeriodLabel::HalfYear(2).months().len(), 6);
        assert_eq!(PeriodLabel::Month(Month::March).months(), vec![3]);
        assert!(PeriodLabel::Other("Total".to_string()).months().is_empty());
    }
}
