//! Node.js bindings for fieldscope via napi-rs

#![deny(clippy::all)]

use napi::bindgen_prelude::*;
use napi_derive::napi;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

use fieldscope_core::catalog::CatalogError;
use fieldscope_core::config::Settings;
use fieldscope_core::logging::{ConsoleLogger, FileLogger, LogLevel, NoOpLogger, SharedLogger};
use fieldscope_core::shaper::{
    FieldShaper as CoreFieldShaper,
    ProjectionRequest as CoreProjectionRequest,
    ShapedBatch as CoreShapedBatch,
    ShapedRecord as CoreShapedRecord,
};
use fieldscope_core::suggest::{
    FieldValidation as CoreFieldValidation,
    Suggestion as CoreSuggestion,
};
use fieldscope_core::types::{EntityType, ProjectionOptions};

fn to_napi_error(e: impl std::fmt::Display) -> Error {
    Error::from_reason(e.to_string())
}

fn parse_entity_type(tag: &str) -> Result<EntityType> {
    EntityType::parse(tag).ok_or_else(|| to_napi_error(CatalogError::not_found(tag)))
}

// ============================================================================
// Result Types
// ============================================================================

#[napi(object)]
pub struct Suggestion {
    pub requested: String,
    pub corrected: Option<String>,
    pub alternatives: Vec<String>,
    /// "Did you mean" text for tool error messages
    pub hint: String,
}

impl From<CoreSuggestion> for Suggestion {
    fn from(suggestion: CoreSuggestion) -> Self {
        let hint = suggestion.hint();
        Self {
            requested: suggestion.requested,
            corrected: suggestion.corrected,
            alternatives: suggestion.alternatives,
            hint,
        }
    }
}

#[napi(object)]
pub struct FieldValidation {
    pub valid: Vec<String>,
    pub unknown: Vec<Suggestion>,
    pub unsupported: Vec<String>,
    pub hint: String,
}

impl From<CoreFieldValidation> for FieldValidation {
    fn from(validation: CoreFieldValidation) -> Self {
        let hint = validation.hint();
        Self {
            valid: validation.valid,
            unknown: validation.unknown.into_iter().map(Into::into).collect(),
            unsupported: validation.unsupported,
            hint,
        }
    }
}

#[napi(object)]
pub struct ShapedRecord {
    pub record: Value,
    pub suggestions: Vec<Suggestion>,
    pub unsupported: Vec<String>,
    pub hint: String,
}

impl From<CoreShapedRecord> for ShapedRecord {
    fn from(shaped: CoreShapedRecord) -> Self {
        let hint = shaped.hint();
        Self {
            record: shaped.record,
            suggestions: shaped.suggestions.into_iter().map(Into::into).collect(),
            unsupported: shaped.unsupported,
            hint,
        }
    }
}

#[napi(object)]
pub struct ShapedBatch {
    pub records: Vec<Value>,
    /// Requested paths that resolved in no record
    pub never_resolved: Vec<String>,
    pub suggestions: Vec<Suggestion>,
    pub unsupported: Vec<String>,
    pub hint: String,
}

impl From<CoreShapedBatch> for ShapedBatch {
    fn from(batch: CoreShapedBatch) -> Self {
        let hint = batch.hint();
        Self {
            records: batch.records,
            never_resolved: batch.never_resolved,
            suggestions: batch.suggestions.into_iter().map(Into::into).collect(),
            unsupported: batch.unsupported,
            hint,
        }
    }
}

// ============================================================================
// Options
// ============================================================================

#[napi(object)]
pub struct ProjectOptions {
    /// Rebuild nesting (default) or key the result by path string
    pub respect_nesting: Option<bool>,
    pub log_filtering: Option<bool>,
    pub entity_type: Option<String>,
}

impl ProjectOptions {
    fn into_core(self) -> Result<ProjectionOptions> {
        let mut options = ProjectionOptions::default();
        if let Some(respect_nesting) = self.respect_nesting {
            options.respect_nesting = respect_nesting;
        }
        if let Some(log_filtering) = self.log_filtering {
            options.log_filtering = log_filtering;
        }
        if let Some(tag) = self.entity_type {
            options.entity_type = Some(parse_entity_type(&tag)?);
        }
        Ok(options)
    }
}

/// Overrides applied on top of file and environment settings
#[napi(object)]
pub struct ShaperSettings {
    pub catalog_path: Option<String>,
    pub max_alternatives: Option<u32>,
    pub respect_nesting: Option<bool>,
    pub log_filtering: Option<bool>,
    /// Append diagnostics to this file instead of stderr
    pub log_file: Option<String>,
}

impl ShaperSettings {
    fn apply(self, settings: &mut Settings) -> Option<String> {
        if let Some(path) = self.catalog_path {
            settings.catalog_path = Some(path.into());
        }
        if let Some(max) = self.max_alternatives {
            settings.max_alternatives = max as usize;
        }
        if let Some(respect_nesting) = self.respect_nesting {
            settings.respect_nesting = respect_nesting;
        }
        if let Some(log_filtering) = self.log_filtering {
            settings.log_filtering = log_filtering;
        }
        self.log_file
    }
}

fn create_logger(settings: &Settings, log_file: Option<String>) -> Result<SharedLogger> {
    if let Some(path) = log_file {
        let logger = FileLogger::open(path, LogLevel::from_env()).map_err(to_napi_error)?;
        return Ok(Arc::new(logger));
    }
    if settings.log_filtering {
        Ok(Arc::new(ConsoleLogger::new()))
    } else {
        Ok(Arc::new(NoOpLogger::new()))
    }
}

// ============================================================================
// FieldShaper
// ============================================================================

/// Projects tracker records and explains unusable field names
#[napi]
pub struct FieldShaper {
    inner: CoreFieldShaper,
}

impl FieldShaper {
    fn build(mut settings: Settings, overrides: Option<ShaperSettings>) -> Result<Self> {
        let log_file = overrides.and_then(|o| o.apply(&mut settings));
        let logger = create_logger(&settings, log_file)?;
        let inner = CoreFieldShaper::from_settings(settings, logger).map_err(to_napi_error)?;
        Ok(Self { inner })
    }
}

#[napi]
impl FieldShaper {
    /// Defaults and `FIELDSCOPE_*` environment variables, then `settings`
    #[napi(constructor)]
    pub fn new(settings: Option<ShaperSettings>) -> Result<Self> {
        let base = Settings::default().apply_env().map_err(to_napi_error)?;
        Self::build(base, settings)
    }

    /// User and workspace settings files, environment, then `settings`
    #[napi(factory)]
    pub fn from_workspace(workspace_root: String, settings: Option<ShaperSettings>) -> Result<Self> {
        let base = Settings::resolve(Some(Path::new(&workspace_root))).map_err(to_napi_error)?;
        Self::build(base, settings)
    }

    #[napi(getter)]
    pub fn entity_types(&self) -> Vec<String> {
        self.inner
            .catalog()
            .entity_types()
            .into_iter()
            .map(|e| e.as_str().to_string())
            .collect()
    }

    #[napi]
    pub fn project(&self, record: Value, fields: Option<Vec<String>>, entity_type: Option<String>) -> Result<Value> {
        let mut options = self.inner.settings().projection_options();
        if let Some(tag) = entity_type {
            options.entity_type = Some(parse_entity_type(&tag)?);
        }
        Ok(self.inner.projector().project_owned(record, fields.as_deref(), &options))
    }

    #[napi]
    pub fn suggest(&self, entity_type: String, field: String) -> Result<Suggestion> {
        self.inner
            .suggestions()
            .suggest(&entity_type, &field)
            .map(Into::into)
            .map_err(to_napi_error)
    }

    #[napi]
    pub fn validate_fields(&self, entity_type: String, fields: Vec<String>) -> Result<FieldValidation> {
        self.inner
            .suggestions()
            .validate_fields(&entity_type, &fields)
            .map(Into::into)
            .map_err(to_napi_error)
    }

    #[napi]
    pub fn shape(&self, entity_type: String, record: Value, fields: Option<Vec<String>>) -> Result<ShapedRecord> {
        let request = CoreProjectionRequest::new(parse_entity_type(&entity_type)?, record)
            .with_fields(fields.unwrap_or_default());
        self.inner.shape(&request).map(Into::into).map_err(to_napi_error)
    }

    #[napi]
    pub fn shape_many(&self, entity_type: String, records: Vec<Value>, fields: Vec<String>) -> Result<ShapedBatch> {
        self.inner
            .shape_many(parse_entity_type(&entity_type)?, &records, &fields)
            .map(Into::into)
            .map_err(to_napi_error)
    }
}

// ============================================================================
// Standalone Functions
// ============================================================================

/// Project a record without a catalog
#[napi]
pub fn project(record: Value, fields: Option<Vec<String>>, options: Option<ProjectOptions>) -> Result<Value> {
    let options = match options {
        Some(options) => options.into_core()?,
        None => ProjectionOptions::default(),
    };
    let logger: SharedLogger = if options.log_filtering {
        Arc::new(ConsoleLogger::new())
    } else {
        Arc::new(NoOpLogger::new())
    };
    let projector = fieldscope_core::Projector::new(logger);
    Ok(projector.project_owned(record, fields.as_deref(), &options))
}

/// Whether a path can ever resolve (no bracket notation, not empty)
#[napi]
pub fn is_supported_path(path: String) -> bool {
    fieldscope_core::FieldPath::is_supported(&path)
}

#[napi]
pub fn supported_entity_types() -> Vec<String> {
    EntityType::ALL.iter().map(|e| e.as_str().to_string()).collect()
}
