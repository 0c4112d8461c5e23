use crate::schema::{DivisionRoster, SheetLayout};
use crate::utils::cell_label;
use crate::workbook::{row_cell, Row};
use serde::{Deserialize, Serialize};

/// A requested entity after roster lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedEntity {
    Group { name: String, members: Vec<String> },
    Individual { name: String },
}

impl ResolvedEntity {
    pub fn name(&self) -> &str {
        match self {
            Self::Group { name, .. } | Self::Individual { name } => name,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group { .. })
    }

    pub fn members(&self) -> &[String] {
        match self {
            Self::Group { members, .. } => members,
            Self::Individual { name } => std::slice::from_ref(name),
        }
    }

    pub fn contains(&self, candidate: &str) -> bool {
        self.members().iter().any(|m| m == candidate)
    }
}

/// Resolves `entity` against the division roster.
///
/// A roster group of that name always wins over an individual of the same
/// name; otherwise the name stands for itself.
pub fn resolve_members(entity: &str, roster: Option<&DivisionRoster>) -> ResolvedEntity {
    match roster.and_then(|r| r.group(entity)) {
        Some(members) => ResolvedEntity::Group {
            name: entity.to_string(),
            members: members.to_vec(),
        },
        None => ResolvedEntity::Individual {
            name: entity.to_string(),
        },
    }
}

/// Selects the data rows of `entity` whose ledger type column equals `variable`.
/// Input order is preserved.
pub fn filter_rows<'a>(
    rows: &'a [Row],
    entity: &ResolvedEntity,
    variable: &str,
    layout: SheetLayout,
) -> Vec<&'a Row> {
    rows.iter()
        .filter(|row| {
            let name_matches = row_cell(row, layout.entity_column())
                .and_then(|cell| cell.as_text())
                .is_some_and(|name| entity.contains(name));
            let variable_matches = row_cell(row, layout.discriminator_column())
                .and_then(|cell| cell.as_text())
                .is_some_and(|value| value == variable);
            name_matches && variable_matches
        })
        .collect()
}

/// Distinct entity names found in the data rows, first-seen order.
pub fn list_sales_reps(rows: &[Row], layout: SheetLayout) -> Vec<String> {
    let mut reps: Vec<String> = Vec::new();
    for row in rows {
        if let Some(name) = row_cell(row, layout.entity_column()).and_then(cell_label) {
            if !reps.contains(&name) {
                reps.push(name);
            }
        }
    }
    reps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CellValue;
    use std::collections::BTreeMap;

    fn row(name: &str, variable: &str, value: f64) -> Row {
        vec![
            name.into(),
            "".into(),
            "".into(),
            "PG-1".into(),
            variable.into(),
            CellValue::Number(value),
        ]
    }

    fn roster() -> DivisionRoster {
        let mut groups = BTreeMap::new();
        groups.insert("North".to_string(), vec!["Rep A".to_string(), "Rep C".to_string()]);
        groups.insert("Rep B".to_string(), vec!["Rep D".to_string()]);
        DivisionRoster {
            defaults: vec!["Rep A".to_string()],
            groups,
        }
    }

    #[test]
    fn test_individual_resolution() {
        let entity = resolve_members("Rep A", Some(&roster()));
        assert_eq!(entity, ResolvedEntity::Individual { name: "Rep A".to_string() });
        assert_eq!(entity.members(), ["Rep A"]);

        let entity = resolve_members("Rep A", None);
        assert!(!entity.is_group());
    }

    #[test]
    fn test_group_takes_precedence_over_row_value() {
        let rows = vec![row("Rep B", "Kgs", 1.0), row("Rep D", "Kgs", 2.0)];
        let entity = resolve_members("Rep B", Some(&roster()));
        assert!(entity.is_group());

        let selected = filter_rows(&rows, &entity, "Kgs", SheetLayout::SalesVolume);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0][0], CellValue::text("Rep D"));
    }

    #[test]
    fn test_filter_is_stable_and_checks_discriminator() {
        let rows = vec![
            row("Rep C", "Kgs", 1.0),
            row("Rep A", "Amount", 2.0),
            row("Rep A", "Kgs", 3.0),
            row("Rep X", "Kgs", 4.0),
        ];
        let entity = resolve_members("North", Some(&roster()));
        let selected = filter_rows(&rows, &entity, "Kgs", SheetLayout::SalesVolume);
        let values: Vec<&CellValue> = selected.iter().map(|r| &r[5]).collect();
        assert_eq!(values, vec![&CellValue::Number(1.0), &CellValue::Number(3.0)]);
    }

    #[test]
    fn test_short_rows_are_not_selected() {
        let rows = vec![vec![CellValue::text("Rep A")]];
        let entity = resolve_members("Rep A", None);
        assert!(filter_rows(&rows, &entity, "Kgs", SheetLayout::Volume).is_empty());
    }

    #[test]
    fn test_list_sales_reps() {
        let rows = vec![
            row("Rep B", "Kgs", 1.0),
            row("Rep A", "Kgs", 1.0),
            row("Rep B", "Amount", 1.0),
            vec![CellValue::Empty],
        ];
        assert_eq!(list_sales_reps(&rows, SheetLayout::SalesVolume), vec!["Rep B", "Rep A"]);
    }
}
