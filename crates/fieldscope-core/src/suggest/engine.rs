//! Suggestion engine
//!
//! Turns a misspelled or unknown field name into a correction (from the
//! typo table) and a ranked list of alternatives (from usage statistics and
//! the contextual order). Pure and deterministic: the same input against
//! the same catalog always yields the same output, in the same order.

use std::cmp::Reverse;
use std::sync::Arc;

use super::suggestion::{FieldValidation, Suggestion};
use crate::catalog::{CatalogResult, EntityFieldCatalog, FieldCatalog};
use crate::types::FieldPath;

/// Default bound on the number of alternatives
pub const DEFAULT_MAX_ALTERNATIVES: usize = 5;

/// Suggests corrections for field names using a field catalog
#[derive(Debug, Clone)]
pub struct SuggestionEngine {
    catalog: Arc<FieldCatalog>,
    max_alternatives: usize,
}

impl SuggestionEngine {
    pub fn new(catalog: Arc<FieldCatalog>) -> Self {
        Self {
            catalog,
            max_alternatives: DEFAULT_MAX_ALTERNATIVES,
        }
    }

    /// Bound the number of alternatives returned
    pub fn with_max_alternatives(mut self, max: usize) -> Self {
        self.max_alternatives = max;
        self
    }

    pub fn catalog(&self) -> &Arc<FieldCatalog> {
        &self.catalog
    }

    pub fn max_alternatives(&self) -> usize {
        self.max_alternatives
    }

    /// Suggest corrections for `requested` on an entity type
    ///
    /// Fails only when there is no catalog for `entity_type`.
    pub fn suggest(&self, entity_type: &str, requested: &str) -> CatalogResult<Suggestion> {
        let entity = self.catalog.lookup(entity_type)?;
        Ok(self.suggest_in(entity, requested))
    }

    /// Suggest against an already looked-up entity catalog
    pub fn suggest_in(&self, entity: &EntityFieldCatalog, requested: &str) -> Suggestion {
        let corrected = correct(entity, requested);
        let alternatives = self.rank_alternatives(entity, requested, corrected.as_deref());

        Suggestion {
            requested: requested.to_string(),
            corrected,
            alternatives,
        }
    }

    /// Classify requested paths as valid, unknown or unsupported
    pub fn validate_fields<S: AsRef<str>>(
        &self,
        entity_type: &str,
        paths: &[S],
    ) -> CatalogResult<FieldValidation> {
        let entity = self.catalog.lookup(entity_type)?;
        let mut validation = FieldValidation::default();

        for raw in paths {
            let raw = raw.as_ref();
            match FieldPath::parse(raw) {
                Err(_) => validation.unsupported.push(raw.to_string()),
                Ok(path) if entity.is_known(path.root()) => validation.valid.push(raw.to_string()),
                Ok(_) => validation.unknown.push(self.suggest_in(entity, raw)),
            }
        }

        Ok(validation)
    }

    /// Contextual fields first, then the remaining fields with statistics,
    /// stable-sorted by descending frequency. Fields without statistics rank
    /// below `low`.
    fn rank_alternatives(
        &self,
        entity: &EntityFieldCatalog,
        requested: &str,
        corrected: Option<&str>,
    ) -> Vec<String> {
        let excluded = [Some(root_of(requested)), corrected.map(root_of)];

        let mut candidates: Vec<&str> = Vec::new();
        let ordered = entity
            .contextual()
            .iter()
            .map(String::as_str)
            .chain(entity.usage_fields().map(|(name, _)| name));
        for name in ordered {
            if !candidates.contains(&name) && !excluded.contains(&Some(name)) {
                candidates.push(name);
            }
        }

        candidates.sort_by_key(|name| Reverse(entity.usage(name).map(|u| u.frequency)));
        candidates.truncate(self.max_alternatives);
        candidates.into_iter().map(str::to_string).collect()
    }
}

/// Typo-table correction: the full string first, then the root segment
fn correct(entity: &EntityFieldCatalog, requested: &str) -> Option<String> {
    if let Some(canonical) = entity.correction(requested) {
        return Some(canonical.to_string());
    }

    let path = FieldPath::parse(requested).ok()?;
    if !path.is_nested() {
        return None;
    }
    entity
        .correction(path.root())
        .map(|root| format!("{}{}", root, path.suffix()))
}

fn root_of(path: &str) -> &str {
    path.split('.').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogError, FieldUsage, UsageFrequency};
    use crate::types::EntityType;
    use chrono::{TimeZone, Utc};

    fn catalog() -> Arc<FieldCatalog> {
        let generated_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let issue = EntityFieldCatalog::new(EntityType::Issue, generated_at)
            .with_fields(["id", "key", "summary", "status", "assignee", "labels", "duedate"])
            .with_typo("summry", "summary")
            .with_typo("asignee", "assignee")
            .with_usage("key", FieldUsage::new(UsageFrequency::High, 1.0))
            .with_usage("summary", FieldUsage::new(UsageFrequency::High, 1.0))
            .with_usage("status", FieldUsage::new(UsageFrequency::High, 1.0))
            .with_usage("assignee", FieldUsage::new(UsageFrequency::Medium, 0.7))
            .with_usage("labels", FieldUsage::new(UsageFrequency::Low, 0.4))
            .with_usage("duedate", FieldUsage::new(UsageFrequency::Low, 0.1))
            .with_contextual("labels")
            .with_contextual("summary")
            .with_contextual("description")
            .with_contextual("status")
            .with_contextual("assignee");
        let user = EntityFieldCatalog::new(EntityType::User, generated_at)
            .with_fields(["accountId", "displayName"])
            .with_contextual("displayName");
        Arc::new(FieldCatalog::new([issue, user]))
    }

    #[test]
    fn test_typo_correction() {
        let engine = SuggestionEngine::new(catalog());
        let suggestion = engine.suggest("issue", "summry").unwrap();
        assert_eq!(suggestion.requested, "summry");
        assert_eq!(suggestion.corrected.as_deref(), Some("summary"));
        assert!(!suggestion.alternatives.contains(&"summary".to_string()));
    }

    #[test]
    fn test_alternatives_ranked_by_frequency_then_context() {
        let engine = SuggestionEngine::new(catalog());
        let suggestion = engine.suggest("issue", "foo").unwrap();
        assert_eq!(suggestion.corrected, None);
        // high (contextual order, then by name), medium, low, then unranked
        assert_eq!(
            suggestion.alternatives,
            vec!["summary", "status", "key", "assignee", "labels"]
        );

        let unbounded = SuggestionEngine::new(catalog()).with_max_alternatives(10);
        assert_eq!(
            unbounded.suggest("issue", "foo").unwrap().alternatives,
            vec!["summary", "status", "key", "assignee", "labels", "duedate", "description"]
        );
    }

    #[test]
    fn test_root_segment_correction() {
        let engine = SuggestionEngine::new(catalog());
        let suggestion = engine.suggest("issue", "asignee.displayName").unwrap();
        assert_eq!(suggestion.corrected.as_deref(), Some("assignee.displayName"));
        assert!(!suggestion.alternatives.contains(&"assignee".to_string()));
    }

    #[test]
    fn test_requested_field_is_not_its_own_alternative() {
        let engine = SuggestionEngine::new(catalog());
        let suggestion = engine.suggest("issue", "status.nme").unwrap();
        assert_eq!(suggestion.corrected, None);
        assert!(!suggestion.alternatives.contains(&"status".to_string()));
    }

    #[test]
    fn test_suggest_is_deterministic() {
        let engine = SuggestionEngine::new(catalog());
        let first = engine.suggest("issue", "whatever").unwrap();
        for _ in 0..10 {
            assert_eq!(engine.suggest("issue", "whatever").unwrap(), first);
        }
    }

    #[test]
    fn test_unknown_entity_type_propagates() {
        let engine = SuggestionEngine::new(catalog());
        assert!(matches!(
            engine.suggest("unknown-entity-type", "summary"),
            Err(CatalogError::NotFound(_))
        ));
        assert!(engine.suggest("project", "name").unwrap_err().is_not_found());
    }

    #[test]
    fn test_validate_fields() {
        let engine = SuggestionEngine::new(catalog());
        let validation = engine
            .validate_fields(
                "issue",
                &["key", "status.name", "summry", "customfield_10016", "components[0].name"],
            )
            .unwrap();

        assert_eq!(validation.valid, vec!["key", "status.name", "customfield_10016"]);
        assert_eq!(validation.unknown.len(), 1);
        assert_eq!(validation.unknown[0].corrected.as_deref(), Some("summary"));
        assert_eq!(validation.unsupported, vec!["components[0].name"]);
        assert!(!validation.is_valid());

        let hint = validation.hint();
        assert!(hint.contains("Did you mean 'summary'?"));
        assert!(hint.contains("request 'components' instead"));
    }

    #[test]
    fn test_validate_clean_request() {
        let engine = SuggestionEngine::new(catalog());
        let validation = engine.validate_fields("user", &["accountId", "displayName"]).unwrap();
        assert!(validation.is_valid());
        assert_eq!(validation.hint(), "");
    }

    #[test]
    fn test_builtin_catalog_scenario() {
        let engine = SuggestionEngine::new(FieldCatalog::builtin().unwrap());
        let suggestion = engine.suggest("issue", "summry").unwrap();
        assert_eq!(suggestion.corrected.as_deref(), Some("summary"));
        assert_eq!(suggestion.alternatives.len(), DEFAULT_MAX_ALTERNATIVES);
        assert_eq!(suggestion.alternatives[0], "key");
    }
}
