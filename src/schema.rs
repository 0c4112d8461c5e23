use crate::error::{LedgerError, Result};
use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// A single spreadsheet cell as handed over by the parsing layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the string payload, only for text cells.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Empty)
    }
}

/// Identifies one reporting column through the three header rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct PeriodKey {
    #[schemars(description = "Reporting year, e.g. 2024")]
    pub year: i32,

    #[schemars(description = "Month name or period label exactly as written in the sheet, e.g. 'January' or 'Q1'")]
    pub month: String,

    #[serde(rename = "type")]
    #[schemars(description = "Period type exactly as written in the sheet, e.g. 'Actual' or 'Budget'")]
    pub period_type: String,
}

impl PeriodKey {
    pub fn new(year: i32, month: impl Into<String>, period_type: impl Into<String>) -> Self {
        Self {
            year,
            month: month.into(),
            period_type: period_type.into(),
        }
    }

    /// Human readable label, e.g. "January 2024 Actual" or "Q1 2024 Budget".
    pub fn label(&self) -> String {
        format!(
            "{} {} {}",
            crate::utils::classify_period_label(&self.month),
            self.year,
            self.period_type
        )
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.year, self.month, self.period_type)
    }
}

/// Column conventions of the two sheet kinds a division may publish.
///
/// Both kinds keep the entity name in column 0, the ledger type discriminator
/// in column 4 and period data from column 5 onward. They differ in where the
/// product group label lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind")]
pub enum SheetLayout {
    /// `<Division>-S&V`: sales & variance sheet, product group in column 3.
    #[serde(rename = "SV")]
    SalesVolume,

    /// `<Division>-Volume`: volume-only sheet, product group in column 1.
    #[serde(rename = "Volume")]
    Volume,
}

impl SheetLayout {
    /// Sheet kinds in the order a division's sources are consulted.
    pub const FALLBACK_ORDER: [SheetLayout; 2] = [SheetLayout::SalesVolume, SheetLayout::Volume];

    pub fn entity_column(self) -> usize {
        0
    }

    pub fn label_column(self) -> usize {
        match self {
            Self::SalesVolume => 3,
            Self::Volume => 1,
        }
    }

    pub fn discriminator_column(self) -> usize {
        4
    }

    pub fn sheet_suffix(self) -> &'static str {
        match self {
            Self::SalesVolume => "S&V",
            Self::Volume => "Volume",
        }
    }

    pub fn sheet_name(self, division: &str) -> String {
        format!("{}-{}", division, self.sheet_suffix())
    }
}

/// Who belongs to which sales group within one division.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DivisionRoster {
    #[serde(default)]
    #[schemars(description = "Individual sales representatives listed by default for this division, in display order")]
    pub defaults: Vec<String>,

    #[serde(default)]
    #[schemars(description = "Group name mapped to the ordered list of member representative names")]
    pub groups: BTreeMap<String, Vec<String>>,
}

impl DivisionRoster {
    pub fn group(&self, name: &str) -> Option<&[String]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    /// Every selectable entity: group names first, then the default individuals.
    pub fn entities(&self) -> Vec<String> {
        let mut entities: Vec<String> = self.groups.keys().cloned().collect();
        for name in &self.defaults {
            if !entities.contains(name) {
                entities.push(name.clone());
            }
        }
        entities
    }
}

/// Division identifier (e.g. "FP", "HCM") mapped to that division's roster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct RosterConfig {
    pub divisions: BTreeMap<String, DivisionRoster>,
}

impl RosterConfig {
    pub fn division(&self, id: &str) -> Option<&DivisionRoster> {
        self.divisions.get(id)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: RosterConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading roster configuration from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    fn validate(&self) -> Result<()> {
        for (division, roster) in &self.divisions {
            if division.trim().is_empty() {
                return Err(LedgerError::InvalidRoster(
                    "division identifier must not be empty".to_string(),
                ));
            }
            if let Some(group) = roster.groups.keys().find(|g| g.trim().is_empty()) {
                return Err(LedgerError::InvalidRoster(format!(
                    "division '{}' has a group with an empty name ({:?})",
                    division, group
                )));
            }
        }
        Ok(())
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(RosterConfig)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

/// Parameters of one dashboard request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SalesQuery {
    #[schemars(description = "Division identifier selecting the '<Division>-S&V' / '<Division>-Volume' sheets")]
    pub division: String,

    #[schemars(description = "Sales representative name or roster group name")]
    pub entity: String,

    #[schemars(description = "Ledger / variable type discriminator, e.g. 'Kgs' or 'Amount'")]
    pub variable: String,

    #[schemars(description = "Reporting periods to extract")]
    pub periods: Vec<PeriodKey>,
}

impl SalesQuery {
    pub fn new(
        division: impl Into<String>,
        entity: impl Into<String>,
        variable: impl Into<String>,
        periods: Vec<PeriodKey>,
    ) -> Self {
        Self {
            division: division.into(),
            entity: entity.into(),
            variable: variable.into(),
            periods,
        }
    }

    /// Rejects blank division, entity or variable fields.
    ///
    /// Request handlers may call this before running a query;
    /// [`crate::SalesReportProcessor::run`] does not, and answers blank fields
    /// with an empty report.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("division", &self.division),
            ("entity", &self.entity),
            ("variable", &self.variable),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(LedgerError::InvalidQuery(format!("{} must not be empty", field)));
            }
        }
        Ok(())
    }
}
