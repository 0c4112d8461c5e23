//! # Sales Ledger
//!
//! A library for turning divisional sales ledger workbooks into per-product-group
//! figures for a sales representative or a sales group.
//!
//! ## Core Concepts
//!
//! - **Sheet**: rows of cells; rows 0-2 hold the year, month and period type of
//!   every data column, the remaining rows are ledger lines
//! - **Period Key**: a `{year, month, type}` triple naming one data column
//! - **Entity**: an individual representative, or a roster group standing for its members
//! - **Sheet Layout**: `<Division>-S&V` sheets keep the product group in column 3,
//!   `<Division>-Volume` sheets in column 1; the layout is chosen together with the sheet
//!
//! ## Example
//!
//! ```rust,ignore
//! use sales_ledger::*;
//!
//! let workbook = load_xlsx("ledger.xlsx")?;
//! let roster = RosterConfig::load("roster.json")?;
//!
//! let query = SalesQuery::new(
//!     "FP",
//!     "North",
//!     "Kgs",
//!     vec![PeriodKey::new(2024, "January", "Actual")],
//! );
//!
//! let report = run_sales_query(&workbook, &roster, &query)?;
//! println!("{}", report.to_markdown());
//! ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod ingestion;
pub mod period;
pub mod report;
pub mod resolver;
pub mod schema;
pub mod utils;
pub mod workbook;

pub use aggregate::{aggregate_product_groups, ProductGroup, ProductGroupTable};
pub use error::{LedgerError, Result};
pub use filter::{filter_rows, list_sales_reps, resolve_members, ResolvedEntity};
pub use ingestion::*;
pub use period::{available_periods, locate_period_column, locate_period_columns};
pub use report::{PeriodReport, SalesReport, SourceSummary};
pub use resolver::{resolve_source, ResolvedSource};
pub use schema::*;
pub use utils::*;
pub use workbook::{Row, Sheet, Workbook};

use log::{debug, info, warn};

pub struct SalesReportProcessor;

impl SalesReportProcessor {
    pub fn run(workbook: &Workbook, roster: &RosterConfig, query: &SalesQuery) -> Result<SalesReport> {
        info!(
            "Running sales query for {} in division {} ({}, {} periods)",
            query.entity,
            query.division,
            query.variable,
            query.periods.len()
        );

        let entity = resolve_members(&query.entity, roster.division(&query.division));
        if entity.is_group() {
            debug!("{} resolved to group members {:?}", entity.name(), entity.members());
        }

        let Some(source) = resolve_source(workbook, &query.division) else {
            warn!("No data source for division {}", query.division);
            return Ok(SalesReport {
                query: query.clone(),
                entity,
                source: None,
                periods: query
                    .periods
                    .iter()
                    .map(|period| PeriodReport {
                        period: period.clone(),
                        column: None,
                        groups: ProductGroupTable::default(),
                    })
                    .collect(),
            });
        };

        let rows = filter_rows(
            source.sheet.data_rows(),
            &entity,
            &query.variable,
            source.layout,
        );
        debug!(
            "{} of {} rows in '{}' match {} / {}",
            rows.len(),
            source.sheet.data_rows().len(),
            source.sheet_name,
            entity.name(),
            query.variable
        );

        let periods = locate_period_columns(source.sheet, &query.periods)
            .into_iter()
            .map(|(period, column)| {
                let groups = match column {
                    Some(col) => aggregate_product_groups(&rows, col, source.layout),
                    None => {
                        warn!("Period {} not found in '{}'", period, source.sheet_name);
                        ProductGroupTable::default()
                    }
                };
                PeriodReport {
                    period,
                    column,
                    groups,
                }
            })
            .collect();

        Ok(SalesReport {
            query: query.clone(),
            entity,
            source: Some(SourceSummary {
                sheet_name: source.sheet_name.to_string(),
                layout: source.layout,
            }),
            periods,
        })
    }
}

pub fn run_sales_query(workbook: &Workbook, roster: &RosterConfig, query: &SalesQuery) -> Result<SalesReport> {
    SalesReportProcessor::run(workbook, roster, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_rows() -> Vec<Row> {
        let blank = || vec![CellValue::Empty; 5];
        let mut years = blank();
        years.extend([CellValue::Number(2024.0), CellValue::Number(2023.0)]);
        let mut months = blank();
        months.extend([CellValue::text("January"), CellValue::text("January")]);
        let mut types = blank();
        types.extend([CellValue::text("Actual"), CellValue::text("Actual")]);
        vec![years, months, types]
    }

    fn sv_sheet() -> Sheet {
        let mut rows = header_rows();
        rows.push(vec!["Rep A".into(), "".into(), "".into(), "PG-1".into(), "Kgs".into(), 100.into(), 150.into()]);
        rows.push(vec!["Rep A".into(), "".into(), "".into(), "PG-2".into(), "Kgs".into(), 50.into(), 60.into()]);
        rows.push(vec!["Rep B".into(), "".into(), "".into(), "PG-1".into(), "Kgs".into(), 7.into(), 8.into()]);
        rows.push(vec!["Rep A".into(), "".into(), "".into(), "PG-1".into(), "Amount".into(), 999.into(), 999.into()]);
        Sheet::new(rows)
    }

    #[test]
    fn test_end_to_end_processing() {
        let workbook = Workbook::new().with_sheet("FP-S&V", sv_sheet());
        let query = SalesQuery::new("FP", "Rep A", "Kgs", vec![PeriodKey::new(2024, "January", "Actual")]);

        let report = run_sales_query(&workbook, &RosterConfig::default(), &query).unwrap();
        let period = &report.periods[0];
        assert_eq!(period.column, Some(5));
        assert_eq!(
            period.groups.totals(),
            vec![("PG-1".to_string(), 100.0), ("PG-2".to_string(), 50.0)]
        );
        assert_eq!(report.source.as_ref().unwrap().layout, SheetLayout::SalesVolume);
    }

    #[test]
    fn test_group_query_sums_members() {
        let workbook = Workbook::new().with_sheet("FP-S&V", sv_sheet());
        let roster = RosterConfig::from_json_str(r#"{ "FP": { "groups": { "Team": ["Rep A", "Rep B"] } } }"#).unwrap();
        let query = SalesQuery::new("FP", "Team", "Kgs", vec![PeriodKey::new(2023, "January", "Actual")]);

        let report = run_sales_query(&workbook, &roster, &query).unwrap();
        assert!(report.entity.is_group());
        assert_eq!(report.total_for("PG-1", &query.periods[0]), Some(158.0));
        assert_eq!(report.total_for("PG-2", &query.periods[0]), Some(60.0));
    }

    #[test]
    fn test_missing_period_yields_sentinel() {
        let workbook = Workbook::new().with_sheet("FP-S&V", sv_sheet());
        let query = SalesQuery::new("FP", "Rep A", "Kgs", vec![PeriodKey::new(2024, "February", "Actual")]);

        let report = run_sales_query(&workbook, &RosterConfig::default(), &query).unwrap();
        assert_eq!(report.periods[0].column, None);
        assert!(report.is_empty());
        assert!(report.has_source());
    }

    #[test]
    fn test_blank_query_fields_yield_empty_report() {
        let period = PeriodKey::new(2024, "January", "Actual");
        let query = SalesQuery::new("HCM", "", "Kgs", vec![period.clone()]);
        let report = run_sales_query(&Workbook::new(), &RosterConfig::default(), &query).unwrap();
        assert!(report.is_empty());
        assert!(!report.has_source());

        let workbook = Workbook::new().with_sheet("FP-S&V", sv_sheet());
        let query = SalesQuery::new("FP", "", "", vec![period]);
        let report = run_sales_query(&workbook, &RosterConfig::default(), &query).unwrap();
        assert_eq!(report.periods[0].column, Some(5));
        assert!(report.is_empty());
    }

    #[test]
    fn test_blank_entity_matches_only_blank_name_cells() {
        let mut rows = header_rows();
        rows.push(vec!["".into(), "".into(), "".into(), "PG-9".into(), "Kgs".into(), 4.into(), 0.into()]);
        rows.push(vec!["Rep A".into(), "".into(), "".into(), "PG-1".into(), "Kgs".into(), 1.into(), 0.into()]);
        let workbook = Workbook::new().with_sheet("FP-S&V", Sheet::new(rows));

        let period = PeriodKey::new(2024, "January", "Actual");
        let query = SalesQuery::new("FP", "", "Kgs", vec![period.clone()]);
        let report = run_sales_query(&workbook, &RosterConfig::default(), &query).unwrap();
        assert!(!report.entity.is_group());
        assert_eq!(report.product_group_labels(), vec!["PG-9"]);
        assert_eq!(report.total_for("PG-9", &period), Some(4.0));
    }
}
