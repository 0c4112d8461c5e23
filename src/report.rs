use crate::aggregate::ProductGroupTable;
use crate::filter::ResolvedEntity;
use crate::schema::{PeriodKey, SalesQuery, SheetLayout};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub sheet_name: String,
    pub layout: SheetLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodReport {
    pub period: PeriodKey,
    /// Data column of the period, `None` when the sheet has no such column.
    pub column: Option<usize>,
    pub groups: ProductGroupTable,
}

impl PeriodReport {
    pub fn is_located(&self) -> bool {
        self.column.is_some()
    }
}

/// Result of one sales query, ready for table/chart rendering or export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    pub query: SalesQuery,
    pub entity: ResolvedEntity,
    /// `None` when the division has no sheet at all.
    pub source: Option<SourceSummary>,
    pub periods: Vec<PeriodReport>,
}

impl SalesReport {
    pub fn period(&self, key: &PeriodKey) -> Option<&PeriodReport> {
        self.periods.iter().find(|p| p.period == *key)
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// True when no period produced a single product group.
    pub fn is_empty(&self) -> bool {
        self.periods.iter().all(|p| p.groups.is_empty())
    }

    /// Labels across all periods, first-seen order.
    pub fn product_group_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for period in &self.periods {
            for label in period.groups.labels() {
                if !labels.iter().any(|l| l == label) {
                    labels.push(label.to_string());
                }
            }
        }
        labels
    }

    pub fn total_for(&self, label: &str, key: &PeriodKey) -> Option<f64> {
        self.period(key)?.groups.get(label).map(|g| g.total)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_csv(&self) -> String {
        let mut output = String::new();

        output.push_str("Product Group");
        for period in &self.periods {
            output.push(',');
            output.push_str(&csv_field(&period.period.label()));
        }
        output.push('\n');

        for label in self.product_group_labels() {
            output.push_str(&csv_field(&label));
            for period in &self.periods {
                output.push(',');
                if let Some(group) = period.groups.get(&label) {
                    output.push_str(&format!("{:.2}", group.total));
                }
            }
            output.push('\n');
        }

        output.push_str("Total");
        for period in &self.periods {
            output.push(',');
            if period.is_located() {
                output.push_str(&format!("{:.2}", period.groups.grand_total()));
            }
        }
        output.push('\n');

        output
    }

    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "# Sales by Product Group - {}\n\n",
            self.query.entity
        ));
        output.push_str(&format!(
            "**Division:** {} | **Variable:** {}\n\n",
            self.query.division, self.query.variable
        ));

        if let ResolvedEntity::Group { members, .. } = &self.entity {
            output.push_str(&format!("**Group members:** {}\n\n", members.join(", ")));
        }

        let Some(source) = &self.source else {
            output.push_str(&format!(
                "_No data source for division {}._\n",
                self.query.division
            ));
            return output;
        };
        output.push_str(&format!("**Source:** {}\n\n", source.sheet_name));

        output.push_str("| Product Group |");
        for period in &self.periods {
            output.push_str(&format!(" {} |", period.period.label()));
        }
        output.push('\n');
        output.push_str("|---|");
        for _ in &self.periods {
            output.push_str("---:|");
        }
        output.push('\n');

        for label in self.product_group_labels() {
            output.push_str(&format!("| {} |", label));
            for period in &self.periods {
                match period.groups.get(&label) {
                    Some(group) => output.push_str(&format!(" {:.2} |", group.total)),
                    None => output.push_str(" - |"),
                }
            }
            output.push('\n');
        }

        output.push_str("| **Total** |");
        for period in &self.periods {
            if period.is_located() {
                output.push_str(&format!(" **{:.2}** |", period.groups.grand_total()));
            } else {
                output.push_str(" - |");
            }
        }
        output.push('\n');

        let missing: Vec<String> = self
            .periods
            .iter()
            .filter(|p| !p.is_located())
            .map(|p| p.period.label())
            .collect();
        if !missing.is_empty() {
            output.push('\n');
            for label in missing {
                output.push_str(&format!("- No data for {}\n", label));
            }
        }

        output
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
