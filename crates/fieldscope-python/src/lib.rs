//! Python bindings for fieldscope via PyO3
//!
//! Records cross the boundary as JSON strings.

use pyo3::prelude::*;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

use fieldscope_core::catalog::CatalogError;
use fieldscope_core::config::Settings;
use fieldscope_core::logging::{ConsoleLogger, FileLogger, LogLevel, NoOpLogger, SharedLogger};
use fieldscope_core::projection::Projector;
use fieldscope_core::shaper::{FieldShaper as CoreFieldShaper, ProjectionRequest};
use fieldscope_core::suggest::{FieldValidation as CoreFieldValidation, Suggestion as CoreSuggestion};
use fieldscope_core::types::{EntityType, ProjectionOptions};

fn parse_json(json: &str) -> PyResult<Value> {
    serde_json::from_str(json).map_err(|e| PyValueError::new_err(format!("Invalid JSON: {}", e)))
}

fn to_json(value: &impl serde::Serialize) -> PyResult<String> {
    serde_json::to_string(value).map_err(|e| PyRuntimeError::new_err(e.to_string()))
}

fn catalog_err(e: CatalogError) -> PyErr {
    if e.is_not_found() {
        PyValueError::new_err(e.to_string())
    } else {
        PyRuntimeError::new_err(e.to_string())
    }
}

fn parse_entity_type(tag: &str) -> PyResult<EntityType> {
    EntityType::parse(tag).ok_or_else(|| catalog_err(CatalogError::not_found(tag)))
}

// ============================================================================
// Suggestion Types
// ============================================================================

#[pyclass]
#[derive(Clone)]
pub struct Suggestion {
    #[pyo3(get)]
    pub requested: String,
    #[pyo3(get)]
    pub corrected: Option<String>,
    #[pyo3(get)]
    pub alternatives: Vec<String>,
    #[pyo3(get)]
    pub hint: String,
}

#[pymethods]
impl Suggestion {
    fn __repr__(&self) -> String {
        format!(
            "Suggestion(requested='{}', corrected={:?}, alternatives={:?})",
            self.requested, self.corrected, self.alternatives
        )
    }

    fn __str__(&self) -> String {
        self.hint.clone()
    }
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

#[pyclass]
#[derive(Clone)]
pub struct FieldValidation {
    #[pyo3(get)]
    pub valid: Vec<String>,
    #[pyo3(get)]
    pub unknown: Vec<Suggestion>,
    #[pyo3(get)]
    pub unsupported: Vec<String>,
    #[pyo3(get)]
    pub hint: String,
}

#[pymethods]
impl FieldValidation {
    pub fn is_valid(&self) -> bool {
        self.unknown.is_empty() && self.unsupported.is_empty()
    }

    fn __repr__(&self) -> String {
        format!(
            "FieldValidation(valid={:?}, unknown={}, unsupported={:?})",
            self.valid,
            self.unknown.len(),
            self.unsupported
        )
    }
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

// ============================================================================
// FieldShaper
// ============================================================================

/// Projects tracker records and explains unusable field names
#[pyclass]
pub struct FieldShaper {
    inner: Arc<CoreFieldShaper>,
}

#[pymethods]
impl FieldShaper {
    /// Settings come from the user file, the workspace file (when
    /// `workspace_root` is given) and `FIELDSCOPE_*` variables; keyword
    /// arguments override them.
    #[new]
    #[pyo3(signature = (catalog_path=None, workspace_root=None, max_alternatives=None, log_filtering=None, log_file=None))]
    pub fn new(
        catalog_path: Option<String>,
        workspace_root: Option<String>,
        max_alternatives: Option<usize>,
        log_filtering: Option<bool>,
        log_file: Option<String>,
    ) -> PyResult<Self> {
        let mut settings = Settings::resolve(workspace_root.as_deref().map(Path::new))
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
        if let Some(path) = catalog_path {
            settings.catalog_path = Some(path.into());
        }
        if let Some(max) = max_alternatives {
            settings.max_alternatives = max;
        }
        if let Some(log_filtering) = log_filtering {
            settings.log_filtering = log_filtering;
        }

        let logger: SharedLogger = match log_file {
            Some(path) => Arc::new(
                FileLogger::open(path, LogLevel::from_env())
                    .map_err(|e| PyRuntimeError::new_err(e.to_string()))?,
            ),
            None if settings.log_filtering => Arc::new(ConsoleLogger::new()),
            None => Arc::new(NoOpLogger::new()),
        };

        let inner = CoreFieldShaper::from_settings(settings, logger)
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
        Ok(Self { inner: Arc::new(inner) })
    }

    #[getter]
    pub fn entity_types(&self) -> Vec<String> {
        self.inner
            .catalog()
            .entity_types()
            .into_iter()
            .map(|e| e.as_str().to_string())
            .collect()
    }

    #[getter]
    pub fn max_alternatives(&self) -> usize {
        self.inner.suggestions().max_alternatives()
    }

    /// Project a JSON record; returns JSON
    #[pyo3(signature = (record_json, fields=None))]
    pub fn project(&self, record_json: &str, fields: Option<Vec<String>>) -> PyResult<String> {
        let record = parse_json(record_json)?;
        let options = self.inner.settings().projection_options();
        let projected = self.inner.projector().project_owned(record, fields.as_deref(), &options);
        to_json(&projected)
    }

    pub fn suggest(&self, entity_type: &str, field: &str) -> PyResult<Suggestion> {
        self.inner
            .suggestions()
            .suggest(entity_type, field)
            .map(Into::into)
            .map_err(catalog_err)
    }

    pub fn validate_fields(&self, entity_type: &str, fields: Vec<String>) -> PyResult<FieldValidation> {
        self.inner
            .suggestions()
            .validate_fields(entity_type, &fields)
            .map(Into::into)
            .map_err(catalog_err)
    }

    /// Shape a JSON record; returns `{"record": ..., "suggestions": [...], "unsupported": [...]}`
    #[pyo3(signature = (entity_type, record_json, fields=None))]
    pub fn shape(&self, entity_type: &str, record_json: &str, fields: Option<Vec<String>>) -> PyResult<String> {
        let request = ProjectionRequest::new(parse_entity_type(entity_type)?, parse_json(record_json)?)
            .with_fields(fields.unwrap_or_default());
        let shaped = self.inner.shape(&request).map_err(catalog_err)?;
        to_json(&shaped)
    }

    /// Shape a JSON array of records; returns the batch as JSON
    pub fn shape_many(&self, entity_type: &str, records_json: &str, fields: Vec<String>) -> PyResult<String> {
        let records = match parse_json(records_json)? {
            Value::Array(records) => records,
            _ => return Err(PyValueError::new_err("Expected a JSON array of records")),
        };
        let batch = self
            .inner
            .shape_many(parse_entity_type(entity_type)?, &records, &fields)
            .map_err(catalog_err)?;
        to_json(&batch)
    }

    fn __repr__(&self) -> String {
        format!("FieldShaper(entity_types={:?})", self.entity_types())
    }
}

// ============================================================================
// Functions
// ============================================================================

/// Project a JSON record without a catalog; returns JSON
#[pyfunction]
#[pyo3(signature = (record_json, fields=None, respect_nesting=true))]
fn project(record_json: &str, fields: Option<Vec<String>>, respect_nesting: bool) -> PyResult<String> {
    let record = parse_json(record_json)?;
    let options = ProjectionOptions {
        respect_nesting,
        ..Default::default()
    };
    let projected = Projector::default().project_owned(record, fields.as_deref(), &options);
    to_json(&projected)
}

#[pyfunction]
fn supported_entity_types() -> Vec<String> {
    EntityType::ALL.iter().map(|e| e.as_str().to_string()).collect()
}

// ============================================================================
// Module Definition
// ============================================================================

#[pymodule]
fn fieldscope(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Suggestion>()?;
    m.add_class::<FieldValidation>()?;
    m.add_class::<FieldShaper>()?;

    m.add_function(wrap_pyfunction!(project, m)?)?;
    m.add_function(wrap_pyfunction!(supported_entity_types, m)?)?;

    Ok(())
}
