// Form module - a snapshot of the query form's controls
// Each type mirrors one group of controls; the builder only reads these values

pub mod fields;

use crate::error::QueryError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The dataset tab that is active on the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    Courses,
    Rooms,
}

impl Dataset {
    /// Lowercase name, also used as the key prefix
    pub fn name(&self) -> &'static str {
        match self {
            Dataset::Courses => "courses",
            Dataset::Rooms => "rooms",
        }
    }
}

/// The radio group choosing how multiple conditions combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicConnector {
    /// All of the following (AND)
    #[default]
    All,
    /// Any of the following (OR)
    Any,
    /// None of the following (NOT)
    None,
}

/// One condition row
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConditionRow {
    /// The row's "not" checkbox
    #[serde(default)]
    pub not: bool,
    /// Selected field label, e.g. "Average"
    #[serde(default)]
    pub field: Option<String>,
    /// Selected operator label: EQ, GT, LT or IS
    #[serde(default)]
    pub operator: Option<String>,
    /// Contents of the text input
    #[serde(default)]
    pub text: String,
}

/// One checkbox in the columns section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ColumnChoice {
    /// A dataset field, identified by its bare key (`avg`)
    Field {
        key: String,
        #[serde(default)]
        checked: bool,
    },
    /// A transformation defined further down the form, by its name
    Transformation {
        name: String,
        #[serde(default)]
        checked: bool,
    },
}

impl ColumnChoice {
    pub fn is_checked(&self) -> bool {
        match self {
            ColumnChoice::Field { checked, .. } | ColumnChoice::Transformation { checked, .. } => {
                *checked
            }
        }
    }
}

/// A selected option of the multi-select order list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OrderKey {
    /// A dataset field by label ("Average")
    Field { label: String },
    /// A transformation by name
    Transformation { name: String },
}

/// The order section: selected keys plus the "descending" checkbox
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderControls {
    #[serde(default)]
    pub selected: Vec<OrderKey>,
    #[serde(default)]
    pub descending: bool,
}

/// One checkbox in the groups section, identified by its bare key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupChoice {
    pub key: String,
    #[serde(default)]
    pub checked: bool,
}

/// One transformation row
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformationRow {
    /// The name typed into the row's text input
    #[serde(default)]
    pub name: String,
    /// Selected aggregation label: MAX, MIN, AVG, COUNT or SUM
    #[serde(default)]
    pub operator: Option<String>,
    /// Selected field label
    #[serde(default)]
    pub field: Option<String>,
}

/// The complete state of the query form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormState {
    pub dataset: Dataset,
    #[serde(default)]
    pub connector: LogicConnector,
    #[serde(default)]
    pub conditions: Vec<ConditionRow>,
    #[serde(default)]
    pub columns: Vec<ColumnChoice>,
    #[serde(default)]
    pub order: OrderControls,
    #[serde(default)]
    pub groups: Vec<GroupChoice>,
    #[serde(default)]
    pub transformations: Vec<TransformationRow>,
}

impl FormState {
    /// An untouched form for the given dataset
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            connector: LogicConnector::default(),
            conditions: Vec::new(),
            columns: Vec::new(),
            order: OrderControls::default(),
            groups: Vec::new(),
            transformations: Vec::new(),
        }
    }

    /// Parse a form snapshot from JSON text
    pub fn from_json(json: &str) -> Result<Self, QueryError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a form snapshot from a JSON file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, QueryError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_form_uses_defaults() {
        let form = FormState::from_json(r#"{"dataset": "rooms"}"#).unwrap();
        assert_eq!(form.dataset, Dataset::Rooms);
        assert_eq!(form.connector, LogicConnector::All);
        assert!(form.conditions.is_empty());
        assert!(!form.order.descending);
    }

    #[test]
    fn test_full_form_parses() {
        let json = r#"{
            "dataset": "courses",
            "connector": "none",
            "conditions": [{"not": true, "field": "Average", "operator": "GT", "text": "90"}],
            "columns": [
                {"kind": "field", "key": "dept", "checked": true},
                {"kind": "transformation", "name": "maxAvg"}
            ],
            "order": {"selected": [{"kind": "field", "label": "Average"}], "descending": true},
            "groups": [{"key": "dept", "checked": true}],
            "transformations": [{"name": "maxAvg", "operator": "MAX", "field": "Average"}]
        }"#;
        let form = FormState::from_json(json).unwrap();
        assert_eq!(form.connector, LogicConnector::None);
        assert!(form.conditions[0].not);
        assert!(form.columns[0].is_checked());
        assert!(!form.columns[1].is_checked());
        assert!(matches!(form.order.selected[0], OrderKey::Field { .. }));
        assert_eq!(form.transformations[0].operator.as_deref(), Some("MAX"));
    }

    #[test]
    fn test_unknown_dataset_is_rejected() {
        let err = FormState::from_json(r#"{"dataset": "buildings"}"#).unwrap_err();
        assert!(matches!(err, QueryError::Json(_)));
    }
}
