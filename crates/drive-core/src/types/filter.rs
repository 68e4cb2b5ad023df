//! Filter types for live queries.

use serde::{Deserialize, Serialize};

/// A filter value compared against a document field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// A string value.
    String(String),
    /// Null / missing field.
    Null,
}

impl FilterValue {
    /// Check whether a raw JSON field value satisfies equality with this filter.
    ///
    /// A missing field is treated the same as an explicit `null`. Hosted
    /// document stores usually match `== null` only against a stored `null`;
    /// here a root-level document without a parent field still lists under
    /// the root.
    pub fn matches(&self, field: Option<&serde_json::Value>) -> bool {
        match (self, field) {
            (Self::Null, None) | (Self::Null, Some(serde_json::Value::Null)) => true,
            (Self::String(expected), Some(serde_json::Value::String(actual))) => expected == actual,
            _ => false,
        }
    }
}

impl From<Option<&str>> for FilterValue {
    fn from(value: Option<&str>) -> Self {
        match value {
            Some(v) => Self::String(v.to_string()),
            None => Self::Null,
        }
    }
}

/// A single equality condition on a named field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterField {
    /// The document field name to filter on.
    pub field: String,
    /// The value the field must equal.
    pub value: FilterValue,
}

impl FilterField {
    /// Shorthand for an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Check this condition against a document's fields.
    pub fn matches(&self, data: &serde_json::Map<String, serde_json::Value>) -> bool {
        self.value.matches(data.get(&self.field))
    }
}
