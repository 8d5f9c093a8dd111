//! Configuration errors

use crate::catalog::CatalogError;

/// Errors that can occur while loading or saving settings
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration error: {0}")]
    Other(String),
}

impl ConfigError {
    pub fn invalid_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
