//! Fieldscope Core
//!
//! Field projection and field-name suggestions for issue-tracker records.
//! This crate has no I/O on the request path and can be used from any
//! environment (Node.js via napi-rs, Python via PyO3, native tools, etc.)
//!
//! ## Projection
//!
//! The `projection` module cuts a record down to the requested dotted
//! paths, rebuilding their nesting:
//!
//! ```rust
//! use fieldscope_core::{project, ProjectionOptions};
//! use serde_json::json;
//!
//! let record = json!({ "key": "CORE-1", "status": { "name": "Open", "id": "1" } });
//! let fields = ["status.name"];
//! let shaped = project(&record, Some(fields.as_slice()), &ProjectionOptions::default());
//! assert_eq!(shaped.into_owned(), json!({ "status": { "name": "Open" } }));
//! ```
//!
//! ## Suggestions
//!
//! The `suggest` module uses a per-entity `FieldCatalog` (typo table,
//! usage statistics, contextual order) to explain unknown field names.
//! `FieldShaper` combines both for request handlers.

pub mod types;
pub mod logging;
pub mod config;
pub mod catalog;
pub mod projection;
pub mod suggest;
pub mod shaper;

// Re-export commonly used types
pub use types::{EntityType, FieldPath, ProjectionOptions, UnsupportedPath};

pub use projection::{project, BatchProjection, ProjectionReport, Projector};

pub use catalog::{
    CatalogError, CatalogResult, CatalogLoader,
    EntityFieldCatalog, FieldCatalog, FieldUsage, UsageFrequency, ValueShape,
};

pub use suggest::{FieldValidation, Suggestion, SuggestionEngine};

pub use shaper::{FieldShaper, ProjectionRequest, ShapedBatch, ShapedRecord};

pub use config::{ConfigError, ConfigResult, Settings, SettingsFile, SettingsLoader};

pub use logging::{Logger, SharedLogger, NoOpLogger, ConsoleLogger, FileLogger};
