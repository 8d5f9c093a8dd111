//! Per-entity field catalogs
//!
//! Static metadata about the fields each entity type carries: which names
//! exist, common misspellings, how often each field is populated, which
//! fields matter most, and the value shapes seen for custom fields.
//!
//! Sources:
//! - `FieldCatalog::builtin()`: bundled default, covers every entity type
//! - `CatalogLoader`: YAML/JSON document generated ahead of time
//! - `EntityFieldCatalog` builders: in-code catalogs, mostly for tests

mod error;
mod model;
mod file;
mod builtin;

pub use error::{CatalogError, CatalogResult};
pub use model::{
    is_custom_field_id, EntityFieldCatalog, FieldCatalog, FieldUsage, UsageFrequency, ValueShape,
};
pub use file::{CatalogFile, CatalogFormat, CatalogLoader, EntitySection};
