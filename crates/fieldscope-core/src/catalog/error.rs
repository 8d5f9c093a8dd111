//! Catalog errors

use thiserror::Error;

/// Errors that can occur while looking up or loading field catalogs
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No catalog exists for the entity type. This is a caller defect, not
    /// a data condition, and must reach the request handler.
    #[error("Field catalog not found for entity type: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(String),

    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

impl CatalogError {
    pub fn not_found(entity_type: impl Into<String>) -> Self {
        Self::NotFound(entity_type.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    /// Whether this is the unknown-entity-type case
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
