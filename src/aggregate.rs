use crate::schema::SheetLayout;
use crate::utils::{cell_label, parse_numeric};
use crate::workbook::{row_cell, Row};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductGroup {
    pub label: String,
    pub rows: Vec<Row>,
    /// Sum of every numeric cell at the target column.
    pub total: f64,
    /// How many rows contributed a number to `total`.
    pub contributing_cells: usize,
}

/// Product groups in the order their label was first seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductGroupTable {
    groups: Vec<ProductGroup>,
}

impl ProductGroupTable {
    pub fn groups(&self) -> &[ProductGroup] {
        &self.groups
    }

    pub fn get(&self, label: &str) -> Option<&ProductGroup> {
        self.groups.iter().find(|g| g.label == label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.label.as_str())
    }

    pub fn totals(&self) -> Vec<(String, f64)> {
        self.groups.iter().map(|g| (g.label.clone(), g.total)).collect()
    }

    pub fn grand_total(&self) -> f64 {
        self.groups.iter().map(|g| g.total).sum()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Groups `rows` by their product group label and sums the values found at
/// `column`.
///
/// Rows without a label are dropped. Cells that do not parse as a finite
/// number are skipped; a group whose cells are all non-numeric is kept with a
/// total of zero.
pub fn aggregate_product_groups(rows: &[&Row], column: usize, layout: SheetLayout) -> ProductGroupTable {
    let mut groups: Vec<ProductGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut unlabelled = 0usize;

    for row in rows {
        let Some(label) = row_cell(row, layout.label_column()).and_then(cell_label) else {
            unlabelled += 1;
            continue;
        };

        let slot = *index.entry(label.clone()).or_insert_with(|| {
            groups.push(ProductGroup {
                label,
                rows: Vec::new(),
                total: 0.0,
                contributing_cells: 0,
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        if let Some(value) = row_cell(row, column).and_then(parse_numeric) {
            group.total += value;
            group.contributing_cells += 1;
        }
        group.rows.push((*row).clone());
    }

    debug!(
        "Aggregated {} rows into {} product groups at column {} ({} unlabelled)",
        rows.len(),
        groups.len(),
        column,
        unlabelled
    );

    ProductGroupTable { groups }
}
