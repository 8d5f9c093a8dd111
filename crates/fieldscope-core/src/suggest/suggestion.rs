//! Suggestion result types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Candidate corrections for a requested field name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// The field name as the caller wrote it
    pub requested: String,
    /// Known correction from the typo table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corrected: Option<String>,
    /// Commonly used fields, most useful first
    #[serde(default)]
    pub alternatives: Vec<String>,
}

impl Suggestion {
    pub fn has_correction(&self) -> bool {
        self.corrected.is_some()
    }

    /// Human-readable "did you mean" text
    pub fn hint(&self) -> String {
        let mut hint = format!("Unknown field '{}'.", self.requested);
        if let Some(corrected) = &self.corrected {
            hint.push_str(&format!(" Did you mean '{}'?", corrected));
        }
        if !self.alternatives.is_empty() {
            hint.push_str(&format!(" Commonly used fields: {}.", self.alternatives.join(", ")));
        }
        hint
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hint())
    }
}

/// Classification of a requested field list against a catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidation {
    /// Paths whose top-level field is known
    pub valid: Vec<String>,
    /// Paths whose top-level field is not known, with suggestions
    pub unknown: Vec<Suggestion>,
    /// Paths the projector will never resolve (bracket notation, empty)
    pub unsupported: Vec<String>,
}

impl FieldValidation {
    /// Whether every requested path is known and supported
    pub fn is_valid(&self) -> bool {
        self.unknown.is_empty() && self.unsupported.is_empty()
    }

    /// One line per problem; empty when the request is valid
    pub fn hint(&self) -> String {
        let mut lines: Vec<String> = self.unknown.iter().map(Suggestion::hint).collect();
        lines.extend(self.unsupported.iter().map(|raw| unsupported_hint(raw)));
        lines.join("\n")
    }
}

/// Explain why a bracket path is dropped and what to request instead
pub(crate) fn unsupported_hint(raw: &str) -> String {
    let parent = raw.split('[').next().unwrap_or_default().trim_end_matches('.');
    if raw.is_empty() {
        "Empty field path ignored.".to_string()
    } else if parent.is_empty() {
        format!("Field '{}' uses array notation, which is not supported.", raw)
    } else {
        format!(
            "Field '{}' uses array notation, which is not supported; request '{}' instead.",
            raw, parent
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_with_correction() {
        let suggestion = Suggestion {
            requested: "summry".to_string(),
            corrected: Some("summary".to_string()),
            alternatives: vec!["key".to_string(), "status".to_string()],
        };
        assert_eq!(
            suggestion.to_string(),
            "Unknown field 'summry'. Did you mean 'summary'? Commonly used fields: key, status."
        );
    }

    #[test]
    fn test_hint_without_candidates() {
        let suggestion = Suggestion {
            requested: "foo".to_string(),
            corrected: None,
            alternatives: vec![],
        };
        assert!(!suggestion.has_correction());
        assert_eq!(suggestion.hint(), "Unknown field 'foo'.");
    }

    #[test]
    fn test_unsupported_hint_names_parent() {
        assert_eq!(
            unsupported_hint("components[0].name"),
            "Field 'components[0].name' uses array notation, which is not supported; request 'components' instead."
        );
        assert!(unsupported_hint("[0]").ends_with("not supported."));
        assert_eq!(unsupported_hint(""), "Empty field path ignored.");
    }

    #[test]
    fn test_serialized_shape() {
        let suggestion = Suggestion {
            requested: "x".to_string(),
            corrected: None,
            alternatives: vec!["key".to_string()],
        };
        assert_eq!(
            serde_json::to_value(&suggestion).unwrap(),
            serde_json::json!({ "requested": "x", "alternatives": ["key"] })
        );
    }
}
