//! File-based catalog loading (YAML or JSON)
//!
//! Catalog documents are generated ahead of time from historical field
//! usage and read once at startup. Conventional locations are
//! `~/.config/fieldscope/catalog.yaml` (user) and
//! `.config/fieldscope/catalog.yaml` inside a workspace.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use super::error::{CatalogError, CatalogResult};
use super::model::{EntityFieldCatalog, FieldCatalog, FieldUsage, ValueShape};
use crate::types::EntityType;

/// Catalog document structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Per-entity sections keyed by entity type tag
    #[serde(default)]
    pub entities: BTreeMap<String, EntitySection>,
}

/// One entity type's section of a catalog document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySection {
    /// When the statistics were computed
    pub generated_at: DateTime<Utc>,

    /// Known top-level field names
    #[serde(default)]
    pub fields: Vec<String>,

    /// Misspelling -> canonical field name
    #[serde(default)]
    pub typos: BTreeMap<String, String>,

    /// Field -> usage statistics
    #[serde(default)]
    pub usage: BTreeMap<String, FieldUsage>,

    /// Contextually relevant fields, most relevant first
    #[serde(default)]
    pub contextual: Vec<String>,

    /// Custom field id -> observed value shapes
    #[serde(default)]
    pub custom_fields: BTreeMap<String, BTreeSet<ValueShape>>,
}

/// Document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Yaml,
    Json,
}

impl CatalogFormat {
    /// Pick the format from a file extension; anything but `.json` is YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => CatalogFormat::Json,
            _ => CatalogFormat::Yaml,
        }
    }
}

impl CatalogFile {
    /// Parse a catalog document
    pub fn parse(content: &str, format: CatalogFormat) -> CatalogResult<Self> {
        match format {
            CatalogFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| CatalogError::Parse(format!("Failed to parse YAML: {}", e))),
            CatalogFormat::Json => serde_json::from_str(content)
                .map_err(|e| CatalogError::Parse(format!("Failed to parse JSON: {}", e))),
        }
    }
}

impl EntitySection {
    fn into_catalog(self, entity_type: EntityType) -> CatalogResult<EntityFieldCatalog> {
        let mut catalog = EntityFieldCatalog::new(entity_type, self.generated_at).with_fields(self.fields);

        for (misspelling, canonical) in self.typos {
            if canonical.trim().is_empty() {
                return Err(CatalogError::invalid(format!(
                    "{}: typo '{}' maps to an empty field name",
                    entity_type, misspelling
                )));
            }
            catalog = catalog.with_typo(misspelling, canonical);
        }

        for (field, usage) in self.usage {
            if !(0.0..=1.0).contains(&usage.availability) {
                return Err(CatalogError::invalid(format!(
                    "{}: availability of '{}' is {}, expected 0..=1",
                    entity_type, field, usage.availability
                )));
            }
            catalog = catalog.with_usage(field, usage);
        }

        for field in self.contextual {
            catalog = catalog.with_contextual(field);
        }

        for (id, shapes) in self.custom_fields {
            catalog = catalog.with_custom_field(id, shapes);
        }

        Ok(catalog)
    }
}

impl FieldCatalog {
    /// Build a catalog from a parsed document, validating every section
    pub fn from_file(file: CatalogFile) -> CatalogResult<Self> {
        let mut entities = Vec::with_capacity(file.entities.len());
        for (tag, section) in file.entities {
            let entity_type = EntityType::parse(&tag)
                .ok_or_else(|| CatalogError::invalid(format!("unknown entity type '{}'", tag)))?;
            entities.push(section.into_catalog(entity_type)?);
        }
        Ok(FieldCatalog::new(entities))
    }

    /// Parse and validate a catalog document
    pub fn parse(content: &str, format: CatalogFormat) -> CatalogResult<Self> {
        Self::from_file(CatalogFile::parse(content, format)?)
    }
}

/// Reads a catalog document from disk, once
///
/// The parsed catalog is cached for the lifetime of the loader; there is no
/// reload, a new catalog means a new process.
///
/// # Example
///
/// ```no_run
/// use fieldscope_core::catalog::CatalogLoader;
///
/// let catalog = CatalogLoader::user().load_or_builtin()?;
/// let issue = catalog.lookup("issue")?;
/// # Ok::<(), fieldscope_core::catalog::CatalogError>(())
/// ```
pub struct CatalogLoader {
    path: PathBuf,
    cache: OnceCell<Arc<FieldCatalog>>,
}

impl CatalogLoader {
    /// Create a loader for a specific path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: OnceCell::new(),
        }
    }

    /// User-level catalog (~/.config/fieldscope/catalog.yaml)
    pub fn user() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        Self::new(config_dir.join("fieldscope").join("catalog.yaml"))
    }

    /// Workspace-level catalog (.config/fieldscope/catalog.yaml)
    pub fn workspace(workspace_root: impl AsRef<Path>) -> Self {
        Self::new(
            workspace_root
                .as_ref()
                .join(".config")
                .join("fieldscope")
                .join("catalog.yaml"),
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the catalog, reading the file on first use only
    pub fn load(&self) -> CatalogResult<Arc<FieldCatalog>> {
        self.cache
            .get_or_try_init(|| -> CatalogResult<Arc<FieldCatalog>> {
                let content = fs::read_to_string(&self.path)?;
                let catalog = FieldCatalog::parse(&content, CatalogFormat::from_path(&self.path))?;
                Ok(Arc::new(catalog))
            })
            .map(Arc::clone)
    }

    /// Load the catalog, or the bundled one when the file does not exist
    pub fn load_or_builtin(&self) -> CatalogResult<Arc<FieldCatalog>> {
        if self.exists() {
            self.load()
        } else {
            FieldCatalog::builtin()
        }
    }
}

impl std::fmt::Debug for CatalogLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogLoader")
            .field("path", &self.path)
            .field("loaded", &self.cache.get().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::UsageFrequency;
    use tempfile::tempdir;

    const YAML: &str = r#"
entities:
  issue:
    generated_at: 2024-05-01T12:00:00Z
    fields: [key, id, summary, status]
    typos:
      summry: summary
      asignee: assignee
    usage:
      summary: { frequency: high, availability: 1.0 }
      assignee: { frequency: medium, availability: 0.62 }
    contextual: [summary, status, assignee]
    custom_fields:
      customfield_10016: [number, "null"]
  agile-entity:
    generated_at: 2024-05-01T12:00:00Z
    fields: [id, name, state]
"#;

    #[test]
    fn test_parse_yaml() {
        let catalog = FieldCatalog::parse(YAML, CatalogFormat::Yaml).unwrap();
        assert_eq!(catalog.entity_types(), vec![EntityType::Issue, EntityType::Agile]);

        let issue = catalog.lookup("issue").unwrap();
        assert_eq!(issue.correction("summry"), Some("summary"));
        assert_eq!(issue.usage("assignee").unwrap().frequency, UsageFrequency::Medium);
        assert_eq!(issue.contextual(), &["summary", "status", "assignee"]);
        assert!(issue.custom_field_shapes("customfield_10016").unwrap().contains(&ValueShape::Null));
        assert_eq!(issue.generated_at().to_rfc3339(), "2024-05-01T12:00:00+00:00");

        assert!(catalog.lookup("agile").unwrap().is_known("state"));
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{
            "entities": {
                "user": {
                    "generated_at": "2024-05-01T12:00:00Z",
                    "fields": ["accountId", "displayName"],
                    "typos": { "displayname": "displayName" }
                }
            }
        }"#;
        let catalog = FieldCatalog::parse(json, CatalogFormat::Json).unwrap();
        assert_eq!(catalog.lookup("user").unwrap().correction("displayname"), Some("displayName"));
    }

    #[test]
    fn test_rejects_unknown_entity() {
        let yaml = "entities:\n  widget:\n    generated_at: 2024-05-01T12:00:00Z\n";
        let err = FieldCatalog::parse(yaml, CatalogFormat::Yaml).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid(_)));
    }

    #[test]
    fn test_rejects_bad_availability() {
        let yaml = r#"
entities:
  issue:
    generated_at: 2024-05-01T12:00:00Z
    usage:
      summary: { frequency: high, availability: 1.5 }
"#;
        let err = FieldCatalog::parse(yaml, CatalogFormat::Yaml).unwrap_err();
        assert!(err.to_string().contains("availability"));
    }

    #[test]
    fn test_rejects_malformed_document() {
        let err = FieldCatalog::parse("entities: [", CatalogFormat::Yaml).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(CatalogFormat::from_path(Path::new("c.json")), CatalogFormat::Json);
        assert_eq!(CatalogFormat::from_path(Path::new("c.JSON")), CatalogFormat::Json);
        assert_eq!(CatalogFormat::from_path(Path::new("c.yaml")), CatalogFormat::Yaml);
        assert_eq!(CatalogFormat::from_path(Path::new("catalog")), CatalogFormat::Yaml);
    }

    #[test]
    fn test_loader_reads_once() {
        let dir = tempdir().unwrap();
        let loader = CatalogLoader::workspace(dir.path());
        assert!(!loader.exists());
        assert!(matches!(loader.load(), Err(CatalogError::Io(_))));

        fs::create_dir_all(loader.path().parent().unwrap()).unwrap();
        fs::write(loader.path(), YAML).unwrap();

        let first = loader.load().unwrap();
        // Later edits are not picked up by the same loader
        fs::write(loader.path(), "entities: {}").unwrap();
        let second = loader.load().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn test_loader_falls_back_to_builtin() {
        let dir = tempdir().unwrap();
        let loader = CatalogLoader::new(dir.path().join("missing.yaml"));
        let catalog = loader.load_or_builtin().unwrap();
        assert_eq!(catalog.len(), EntityType::ALL.len());
    }
}
