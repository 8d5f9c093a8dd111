//! Shaper inputs and outputs

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::suggest::{unsupported_hint, Suggestion};
use crate::types::EntityType;

/// A fetched record and the fields the caller asked for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionRequest {
    pub entity_type: EntityType,
    pub record: Value,
    /// Requested paths; empty means the record is returned verbatim
    #[serde(default)]
    pub fields: Vec<String>,
}

impl ProjectionRequest {
    pub fn new(entity_type: EntityType, record: Value) -> Self {
        Self {
            entity_type,
            record,
            fields: Vec::new(),
        }
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }
}

/// A projected record with feedback on the requested fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapedRecord {
    pub record: Value,
    /// Suggestions for requested paths with an unknown root that did not resolve
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unsupported: Vec<String>,
}

impl ShapedRecord {
    /// Whether every requested field was usable
    pub fn is_clean(&self) -> bool {
        self.suggestions.is_empty() && self.unsupported.is_empty()
    }

    /// Feedback text for the caller; empty when clean
    pub fn hint(&self) -> String {
        feedback(&self.suggestions, &self.unsupported)
    }
}

/// Projected search results with feedback on the requested fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapedBatch {
    pub records: Vec<Value>,
    /// Supported paths that resolved in no record
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub never_resolved: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unsupported: Vec<String>,
}

impl ShapedBatch {
    pub fn is_clean(&self) -> bool {
        self.suggestions.is_empty() && self.unsupported.is_empty()
    }

    pub fn hint(&self) -> String {
        feedback(&self.suggestions, &self.unsupported)
    }
}

fn feedback(suggestions: &[Suggestion], unsupported: &[String]) -> String {
    suggestions
        .iter()
        .map(Suggestion::hint)
        .chain(unsupported.iter().map(|raw| unsupported_hint(raw)))
        .collect::<Vec<_>>()
        .join("\n")
}
