//! Settings
//!
//! Layered YAML settings for the field shaper:
//! - `SettingsLoader`: user-level and workspace-level files
//! - `Settings`: resolved values (defaults, then files, then `FIELDSCOPE_*` env vars)

mod error;
mod file;
mod settings;

pub use error::{ConfigError, ConfigResult};
pub use file::{ConfigLevel, SettingsLoader};
pub use settings::{Settings, SettingsFile, CATALOG_ENV, LOG_FILTERING_ENV, MAX_ALTERNATIVES_ENV};
