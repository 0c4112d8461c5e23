use crate::schema::SheetLayout;
use crate::workbook::{Sheet, Workbook};
use log::debug;

/// The sheet chosen for a division together with the layout it must be read with.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedSource<'a> {
    pub sheet_name: &'a str,
    pub sheet: &'a Sheet,
    pub layout: SheetLayout,
}

/// Picks `<division>-S&V` when present, else `<division>-Volume`.
///
/// Returns `None` when the division publishes neither sheet; callers treat
/// that as "no product groups", not as a failure.
pub fn resolve_source<'a>(workbook: &'a Workbook, division: &str) -> Option<ResolvedSource<'a>> {
    SheetLayout::FALLBACK_ORDER.into_iter().find_map(|layout| {
        let name = layout.sheet_name(division);
        let (sheet_name, sheet) = workbook.sheet_entry(&name)?;
        debug!("Division {} resolved to sheet '{}' ({:?})", division, sheet_name, layout);
        Some(ResolvedSource {
            sheet_name,
            sheet,
            layout,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_sheet_preferred() {
        let workbook = Workbook::new()
            .with_sheet("FP-S&V", Sheet::default())
            .with_sheet("FP-Volume", Sheet::default());
        let source = resolve_source(&workbook, "FP").unwrap();
        assert_eq!(source.sheet_name, "FP-S&V");
        assert_eq!(source.layout, SheetLayout::SalesVolume);
        assert_eq!(source.layout.label_column(), 3);
    }

    #[test]
    fn test_falls_back_to_volume_sheet() {
        let workbook = Workbook::new().with_sheet("HCM-Volume", Sheet::default());
        let source = resolve_source(&workbook, "HCM").unwrap();
        assert_eq!(source.sheet_name, "HCM-Volume");
        assert_eq!(source.layout.label_column(), 1);
    }

    #[test]
    fn test_no_source_is_none() {
        let workbook = Workbook::new().with_sheet("FP-S&V", Sheet::default());
        assert!(resolve_source(&workbook, "SB").is_none());
    }
}
