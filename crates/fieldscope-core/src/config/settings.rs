//! Resolved settings

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use super::file::SettingsLoader;
use crate::catalog::{CatalogLoader, CatalogResult, FieldCatalog};
use crate::suggest::DEFAULT_MAX_ALTERNATIVES;
use crate::types::ProjectionOptions;

/// Path to a catalog document
pub const CATALOG_ENV: &str = "FIELDSCOPE_CATALOG";
/// `true`/`false`: log a line per projection
pub const LOG_FILTERING_ENV: &str = "FIELDSCOPE_LOG_FILTERING";
/// Upper bound on suggested alternatives
pub const MAX_ALTERNATIVES_ENV: &str = "FIELDSCOPE_MAX_ALTERNATIVES";

/// Settings as stored in a YAML file; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsFile {
    /// Catalog document to load instead of the bundled one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_alternatives: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respect_nesting: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filtering: Option<bool>,
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub catalog_path: Option<PathBuf>,
    pub max_alternatives: usize,
    pub respect_nesting: bool,
    pub log_filtering: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_path: None,
            max_alternatives: DEFAULT_MAX_ALTERNATIVES,
            respect_nesting: true,
            log_filtering: false,
        }
    }
}

impl Settings {
    /// Overlay the keys `file` sets
    pub fn apply(&mut self, file: &SettingsFile) {
        if let Some(path) = &file.catalog_path {
            self.catalog_path = Some(path.clone());
        }
        if let Some(max) = file.max_alternatives {
            self.max_alternatives = max;
        }
        if let Some(respect_nesting) = file.respect_nesting {
            self.respect_nesting = respect_nesting;
        }
        if let Some(log_filtering) = file.log_filtering {
            self.log_filtering = log_filtering;
        }
    }

    /// Defaults overlaid by each file in order; later files win
    pub fn layered<'a>(files: impl IntoIterator<Item = &'a SettingsFile>) -> Self {
        let mut settings = Settings::default();
        for file in files {
            settings.apply(file);
        }
        settings
    }

    /// Overlay `FIELDSCOPE_*` environment variables
    pub fn apply_env(self) -> ConfigResult<Self> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Overlay variables from an arbitrary lookup
    pub fn apply_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        if let Some(path) = lookup(CATALOG_ENV).filter(|v| !v.trim().is_empty()) {
            self.catalog_path = Some(PathBuf::from(path));
        }
        if let Some(value) = lookup(LOG_FILTERING_ENV) {
            self.log_filtering = parse_bool(LOG_FILTERING_ENV, &value)?;
        }
        if let Some(value) = lookup(MAX_ALTERNATIVES_ENV) {
            self.max_alternatives = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid_value(MAX_ALTERNATIVES_ENV, value.clone()))?;
        }
        Ok(self)
    }

    /// User file, then workspace file (if any), then environment
    pub fn resolve(workspace_root: Option<&Path>) -> ConfigResult<Self> {
        let mut files = vec![SettingsLoader::user().get_settings()?];
        if let Some(root) = workspace_root {
            files.push(SettingsLoader::workspace(root).get_settings()?);
        }
        Settings::layered(&files).apply_env()
    }

    /// Projection defaults derived from these settings
    pub fn projection_options(&self) -> ProjectionOptions {
        ProjectionOptions {
            respect_nesting: self.respect_nesting,
            log_filtering: self.log_filtering,
            entity_type: None,
        }
    }

    /// The configured catalog, or the bundled one when none is configured
    pub fn load_catalog(&self) -> CatalogResult<Arc<FieldCatalog>> {
        match &self.catalog_path {
            Some(path) => CatalogLoader::new(path).load(),
            None => FieldCatalog::builtin(),
        }
    }
}

fn parse_bool(key: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid_value(key, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.max_alternatives, DEFAULT_MAX_ALTERNATIVES);
        assert_eq!(settings.projection_options(), ProjectionOptions::default());
    }

    #[test]
    fn test_later_layers_win() {
        let user = SettingsFile {
            max_alternatives: Some(3),
            log_filtering: Some(true),
            ..Default::default()
        };
        let workspace = SettingsFile {
            max_alternatives: Some(8),
            respect_nesting: Some(false),
            ..Default::default()
        };

        let settings = Settings::layered([&user, &workspace]);
        assert_eq!(settings.max_alternatives, 8);
        assert!(settings.log_filtering);
        assert!(!settings.respect_nesting);
        assert!(settings.catalog_path.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let settings = Settings::default()
            .apply_vars(vars(&[
                (CATALOG_ENV, "/etc/fieldscope/catalog.json"),
                (LOG_FILTERING_ENV, "yes"),
                (MAX_ALTERNATIVES_ENV, " 2 "),
            ]))
            .unwrap();
        assert_eq!(settings.catalog_path, Some(PathBuf::from("/etc/fieldscope/catalog.json")));
        assert!(settings.log_filtering);
        assert_eq!(settings.max_alternatives, 2);
    }

    #[test]
    fn test_invalid_env_values() {
        let err = Settings::default()
            .apply_vars(vars(&[(LOG_FILTERING_ENV, "sometimes")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == LOG_FILTERING_ENV));

        assert!(Settings::default()
            .apply_vars(vars(&[(MAX_ALTERNATIVES_ENV, "many")]))
            .is_err());
    }

    #[test]
    fn test_load_catalog_defaults_to_builtin() {
        let catalog = Settings::default().load_catalog().unwrap();
        assert!(Arc::ptr_eq(&catalog, &FieldCatalog::builtin().unwrap()));
    }

    #[test]
    fn test_load_catalog_from_missing_path_fails() {
        let settings = Settings {
            catalog_path: Some(PathBuf::from("/nonexistent/fieldscope/catalog.yaml")),
            ..Default::default()
        };
        assert!(settings.load_catalog().is_err());
    }
}
