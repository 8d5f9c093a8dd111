//! Bundled default catalog

use std::sync::Arc;

use once_cell::sync::Lazy;

use super::error::{CatalogError, CatalogResult};
use super::file::CatalogFormat;
use super::model::FieldCatalog;

const DEFAULT_CATALOG: &str = include_str!("default_catalog.yaml");

static BUILTIN: Lazy<Result<Arc<FieldCatalog>, String>> = Lazy::new(|| {
    FieldCatalog::parse(DEFAULT_CATALOG, CatalogFormat::Yaml)
        .map(Arc::new)
        .map_err(|e| e.to_string())
});

impl FieldCatalog {
    /// The catalog compiled into the crate, parsed on first use
    pub fn builtin() -> CatalogResult<Arc<FieldCatalog>> {
        match &*BUILTIN {
            Ok(catalog) => Ok(Arc::clone(catalog)),
            Err(message) => Err(CatalogError::Parse(message.clone())),
        }
    }
}
