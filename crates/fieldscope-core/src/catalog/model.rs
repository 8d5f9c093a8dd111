//! Field catalog data model

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{CatalogError, CatalogResult};
use crate::types::{EntityType, FieldPath};

const CUSTOM_FIELD_PREFIX: &str = "customfield_";

/// How often a field is populated across historical records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageFrequency {
    Low,
    Medium,
    High,
}

/// Usage statistics for a single field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldUsage {
    pub frequency: UsageFrequency,
    /// Share of sampled records where the field held a value, `0.0..=1.0`
    pub availability: f64,
}

impl FieldUsage {
    /// Create usage statistics, clamping availability into `0.0..=1.0`
    pub fn new(frequency: UsageFrequency, availability: f64) -> Self {
        Self {
            frequency,
            availability: availability.clamp(0.0, 1.0),
        }
    }
}

/// JSON shape of a value, as observed for custom fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueShape {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Null,
}

impl ValueShape {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => ValueShape::String,
            Value::Number(_) => ValueShape::Number,
            Value::Bool(_) => ValueShape::Boolean,
            Value::Object(_) => ValueShape::Object,
            Value::Array(_) => ValueShape::Array,
            Value::Null => ValueShape::Null,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueShape::String => "string",
            ValueShape::Number => "number",
            ValueShape::Boolean => "boolean",
            ValueShape::Object => "object",
            ValueShape::Array => "array",
            ValueShape::Null => "null",
        }
    }
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `name` looks like a tracker custom field id (`customfield_10016`)
pub fn is_custom_field_id(name: &str) -> bool {
    name.strip_prefix(CUSTOM_FIELD_PREFIX)
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Field metadata for one entity type
///
/// Immutable once built; the builder methods consume and return `self` and
/// are meant for constructing catalogs, not for updating them.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityFieldCatalog {
    entity_type: EntityType,
    generated_at: DateTime<Utc>,
    known: BTreeSet<String>,
    typos: BTreeMap<String, String>,
    usage: BTreeMap<String, FieldUsage>,
    contextual: Vec<String>,
    custom_fields: BTreeMap<String, BTreeSet<ValueShape>>,
}

impl EntityFieldCatalog {
    /// Create an empty catalog for an entity type
    pub fn new(entity_type: EntityType, generated_at: DateTime<Utc>) -> Self {
        Self {
            entity_type,
            generated_at,
            known: BTreeSet::new(),
            typos: BTreeMap::new(),
            usage: BTreeMap::new(),
            contextual: Vec::new(),
            custom_fields: BTreeMap::new(),
        }
    }

    /// Add known field names
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Map a misspelling to its canonical field name
    pub fn with_typo(mut self, misspelling: impl Into<String>, canonical: impl Into<String>) -> Self {
        let canonical = canonical.into();
        self.known.insert(canonical.clone());
        self.typos.insert(misspelling.into(), canonical);
        self
    }

    /// Record usage statistics for a field
    pub fn with_usage(mut self, field: impl Into<String>, usage: FieldUsage) -> Self {
        let field = field.into();
        self.known.insert(field.clone());
        self.usage.insert(field, usage);
        self
    }

    /// Append a field to the contextual suggestion order
    pub fn with_contextual(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        self.known.insert(field.clone());
        if !self.contextual.contains(&field) {
            self.contextual.push(field);
        }
        self
    }

    /// Record the value shapes a custom field has been seen with
    pub fn with_custom_field<I>(mut self, id: impl Into<String>, shapes: I) -> Self
    where
        I: IntoIterator<Item = ValueShape>,
    {
        let id = id.into();
        self.known.insert(id.clone());
        self.custom_fields.entry(id).or_default().extend(shapes);
        self
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    /// When the statistics were computed
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// All known top-level field names, sorted
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.known.iter().map(String::as_str)
    }

    /// Whether `field` is a known top-level field
    ///
    /// Any `customfield_<digits>` id counts as known: custom fields differ
    /// between tracker instances, so absence from the catalog proves nothing.
    pub fn is_known(&self, field: &str) -> bool {
        self.known.contains(field) || is_custom_field_id(field)
    }

    /// Whether the root segment of `path` is known
    ///
    /// Unsupported paths are never known.
    pub fn is_known_path(&self, path: &str) -> bool {
        FieldPath::parse(path)
            .map(|p| self.is_known(p.root()))
            .unwrap_or(false)
    }

    /// Canonical name for a known misspelling
    pub fn correction(&self, misspelling: &str) -> Option<&str> {
        self.typos.get(misspelling).map(String::as_str)
    }

    pub fn usage(&self, field: &str) -> Option<&FieldUsage> {
        self.usage.get(field)
    }

    /// Fields with usage statistics, sorted by name
    pub fn usage_fields(&self) -> impl Iterator<Item = (&str, &FieldUsage)> {
        self.usage.iter().map(|(name, usage)| (name.as_str(), usage))
    }

    /// Most contextually relevant fields, most relevant first
    pub fn contextual(&self) -> &[String] {
        &self.contextual
    }

    pub fn custom_field_shapes(&self, id: &str) -> Option<&BTreeSet<ValueShape>> {
        self.custom_fields.get(id)
    }

    /// Whether a custom field value has a shape seen before
    ///
    /// `None` when the custom field is not in the catalog.
    pub fn accepts_custom_value(&self, id: &str, value: &Value) -> Option<bool> {
        self.custom_fields
            .get(id)
            .map(|shapes| shapes.contains(&ValueShape::of(value)))
    }

    #[cfg(test)]
    pub(crate) fn typo_count(&self) -> usize {
        self.typos.len()
    }
}

/// Field catalogs for every entity type the process serves
///
/// Built once and shared read-only (typically as `Arc<FieldCatalog>`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldCatalog {
    entities: HashMap<EntityType, EntityFieldCatalog>,
}

impl FieldCatalog {
    /// Create a catalog from per-entity catalogs
    ///
    /// A later entry for the same entity type replaces an earlier one.
    pub fn new(entities: impl IntoIterator<Item = EntityFieldCatalog>) -> Self {
        Self {
            entities: entities
                .into_iter()
                .map(|catalog| (catalog.entity_type(), catalog))
                .collect(),
        }
    }

    /// Look up the catalog for an entity type tag
    ///
    /// Fails with [`CatalogError::NotFound`] for tags outside the entity
    /// enumeration and for entity types this catalog has no data for.
    pub fn lookup(&self, entity_type: &str) -> CatalogResult<&EntityFieldCatalog> {
        let entity = EntityType::parse(entity_type).ok_or_else(|| CatalogError::not_found(entity_type))?;
        self.get(entity)
    }

    /// Typed variant of [`FieldCatalog::lookup`]
    pub fn get(&self, entity_type: EntityType) -> CatalogResult<&EntityFieldCatalog> {
        self.entities
            .get(&entity_type)
            .ok_or_else(|| CatalogError::not_found(entity_type.as_str()))
    }

    pub fn contains(&self, entity_type: EntityType) -> bool {
        self.entities.contains_key(&entity_type)
    }

    /// Entity types with a catalog, in declaration order
    pub fn entity_types(&self) -> Vec<EntityType> {
        EntityType::ALL
            .into_iter()
            .filter(|entity| self.entities.contains_key(entity))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn issue_catalog() -> EntityFieldCatalog {
        EntityFieldCatalog::new(EntityType::Issue, Utc::now())
            .with_fields(["key", "id"])
            .with_typo("summry", "summary")
            .with_usage("summary", FieldUsage::new(UsageFrequency::High, 1.0))
            .with_usage("labels", FieldUsage::new(UsageFrequency::Low, 1.7))
            .with_contextual("status")
            .with_contextual("status")
            .with_custom_field("customfield_10016", [ValueShape::Number, ValueShape::Null])
    }

    #[test]
    fn test_frequency_ordering() {
        assert!(UsageFrequency::High > UsageFrequency::Medium);
        assert!(UsageFrequency::Medium > UsageFrequency::Low);
    }

    #[test]
    fn test_availability_is_clamped() {
        let catalog = issue_catalog();
        assert_eq!(catalog.usage("labels").unwrap().availability, 1.0);
        assert_eq!(FieldUsage::new(UsageFrequency::Low, -0.5).availability, 0.0);
    }

    #[test]
    fn test_known_fields() {
        let catalog = issue_catalog();
        assert!(catalog.is_known("key"));
        assert!(catalog.is_known("summary"));
        assert!(catalog.is_known("status"));
        assert!(catalog.is_known("customfield_10016"));
        assert!(catalog.is_known("customfield_99999"));
        assert!(!catalog.is_known("summry"));
        assert!(!catalog.is_known("customfield_"));

        assert!(catalog.is_known_path("status.name"));
        assert!(!catalog.is_known_path("statsu.name"));
        assert!(!catalog.is_known_path("status[0]"));
        assert_eq!(catalog.contextual(), &["status".to_string()]);
    }

    #[test]
    fn test_custom_field_shapes() {
        let catalog = issue_catalog();
        assert_eq!(catalog.accepts_custom_value("customfield_10016", &json!(5)), Some(true));
        assert_eq!(catalog.accepts_custom_value("customfield_10016", &json!(null)), Some(true));
        assert_eq!(catalog.accepts_custom_value("customfield_10016", &json!("5")), Some(false));
        assert_eq!(catalog.accepts_custom_value("customfield_20000", &json!(5)), None);
    }

    #[test]
    fn test_custom_field_id_pattern() {
        assert!(is_custom_field_id("customfield_10001"));
        assert!(!is_custom_field_id("customfield_10a01"));
        assert!(!is_custom_field_id("summary"));
    }

    #[test]
    fn test_lookup() {
        let catalog = FieldCatalog::new([issue_catalog()]);
        assert!(catalog.lookup("issue").is_ok());
        assert!(catalog.lookup("ISSUE").is_ok());

        let err = catalog.lookup("unknown-entity-type").unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(ref tag) if tag == "unknown-entity-type"));

        // Valid tag, but no data loaded for it
        assert!(catalog.lookup("project").unwrap_err().is_not_found());
        assert_eq!(catalog.entity_types(), vec![EntityType::Issue]);
    }
}
