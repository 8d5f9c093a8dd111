//! Field shaper
//!
//! Projects tracker records for a tool response and explains requested
//! fields that could not be used.

use std::sync::Arc;

use serde_json::Value;

use super::request::{ProjectionRequest, ShapedBatch, ShapedRecord};
use crate::catalog::{is_custom_field_id, CatalogResult, EntityFieldCatalog, FieldCatalog, ValueShape};
use crate::config::{ConfigResult, Settings};
use crate::log_info;
use crate::logging::{LoggerExt, SharedLogger};
use crate::projection::{ProjectionReport, Projector};
use crate::suggest::{Suggestion, SuggestionEngine};
use crate::types::{EntityType, FieldPath, ProjectionOptions};

/// Projection plus suggestions against one shared catalog
#[derive(Clone)]
pub struct FieldShaper {
    projector: Projector,
    suggestions: SuggestionEngine,
    settings: Settings,
    logger: SharedLogger,
}

impl std::fmt::Debug for FieldShaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldShaper")
            .field("entity_types", &self.catalog().entity_types())
            .field("settings", &self.settings)
            .finish()
    }
}

impl FieldShaper {
    pub fn new(catalog: Arc<FieldCatalog>, settings: Settings, logger: SharedLogger) -> Self {
        let suggestions = SuggestionEngine::new(catalog).with_max_alternatives(settings.max_alternatives);
        Self {
            projector: Projector::new(logger.clone()),
            suggestions,
            settings,
            logger,
        }
    }

    /// Build a shaper from settings, loading the configured catalog
    pub fn from_settings(settings: Settings, logger: SharedLogger) -> ConfigResult<Self> {
        let catalog = settings.load_catalog()?;
        Ok(Self::new(catalog, settings, logger))
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    pub fn suggestions(&self) -> &SuggestionEngine {
        &self.suggestions
    }

    pub fn catalog(&self) -> &Arc<FieldCatalog> {
        self.suggestions.catalog()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Projection options for an entity type, from the settings
    pub fn options_for(&self, entity_type: EntityType) -> ProjectionOptions {
        self.settings.projection_options().for_entity(entity_type)
    }

    /// Project one record and attach suggestions for unusable fields
    ///
    /// Fails only when the catalog has no data for the entity type.
    pub fn shape(&self, request: &ProjectionRequest) -> CatalogResult<ShapedRecord> {
        let entity = self.catalog().get(request.entity_type)?;
        let options = self.options_for(request.entity_type);

        let ProjectionReport {
            value,
            resolved,
            unresolved,
            unsupported,
        } = self
            .projector
            .project_with_report(&request.record, Some(request.fields.as_slice()), &options);

        self.check_custom_fields(entity, &request.record, &resolved);
        let suggestions = self.suggest_unknown(entity, &unresolved);

        Ok(ShapedRecord {
            record: value.into_owned(),
            suggestions,
            unsupported,
        })
    }

    /// Project a batch and run the representative check
    ///
    /// Suggestions are attached only for paths that resolved in no record
    /// and whose top-level field is not known.
    pub fn shape_many<S: AsRef<str>>(
        &self,
        entity_type: EntityType,
        records: &[Value],
        fields: &[S],
    ) -> CatalogResult<ShapedBatch> {
        let entity = self.catalog().get(entity_type)?;
        let options = self.options_for(entity_type);

        let batch = self.projector.project_many(records, Some(fields), &options);
        let suggestions = self.suggest_unknown(entity, &batch.never_resolved);

        if options.log_filtering {
            log_info!(
                self.logger,
                "[FieldShaper] {}: shaped {} records (never resolved: {:?}, unsupported: {:?})",
                entity_type,
                batch.records.len(),
                batch.never_resolved,
                batch.unsupported
            );
        }

        Ok(ShapedBatch {
            records: batch.records,
            never_resolved: batch.never_resolved,
            suggestions,
            unsupported: batch.unsupported,
        })
    }

    fn suggest_unknown(&self, entity: &EntityFieldCatalog, paths: &[String]) -> Vec<Suggestion> {
        paths
            .iter()
            .filter(|path| !entity.is_known_path(path))
            .map(|path| self.suggestions.suggest_in(entity, path))
            .collect()
    }

    /// Warn about top-level custom field values of a shape never seen in
    /// the catalog data
    fn check_custom_fields(&self, entity: &EntityFieldCatalog, record: &Value, resolved: &[String]) {
        for raw in resolved {
            let Ok(path) = FieldPath::parse(raw) else {
                continue;
            };
            if path.is_nested() || !is_custom_field_id(path.root()) {
                continue;
            }
            let Some(value) = record.get(path.root()) else {
                continue;
            };
            if entity.accepts_custom_value(path.root(), value) == Some(false) {
                self.logger.warn_fmt(format_args!(
                    "[FieldShaper] {}: unexpected value shape for {}: {}",
                    entity.entity_type(),
                    path.root(),
                    ValueShape::of(value)
                ));
            }
        }
    }
}
