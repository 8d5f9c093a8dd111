//! Projection options

use serde::{Deserialize, Serialize};

use super::entity::EntityType;

/// Options controlling how a record is projected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectionOptions {
    /// Rebuild the requested nesting (`true`, default) or key the result by
    /// the literal path string (`false`)
    pub respect_nesting: bool,
    /// Emit a debug line per projection through the projector's logger
    pub log_filtering: bool,
    /// Entity type of the record, for diagnostics only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityType>,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            respect_nesting: true,
            log_filtering: false,
            entity_type: None,
        }
    }
}

impl ProjectionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key the result by path string instead of rebuilding nesting
    pub fn flat(mut self) -> Self {
        self.respect_nesting = false;
        self
    }

    /// Enable diagnostic logging
    pub fn with_logging(mut self) -> Self {
        self.log_filtering = true;
        self
    }

    /// Tag the projection with an entity type
    pub fn for_entity(mut self, entity_type: EntityType) -> Self {
        self.entity_type = Some(entity_type);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ProjectionOptions::default();
        assert!(options.respect_nesting);
        assert!(!options.log_filtering);
        assert!(options.entity_type.is_none());
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let options: ProjectionOptions =
            serde_json::from_str(r#"{"logFiltering": true, "entityType": "issue"}"#).unwrap();
        assert!(options.respect_nesting);
        assert!(options.log_filtering);
        assert_eq!(options.entity_type, Some(EntityType::Issue));
    }
}
