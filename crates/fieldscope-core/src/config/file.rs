//! File-based settings (YAML)
//!
//! Supports user-level (~/.config/fieldscope/config.yaml) and workspace-level
//! (.config/fieldscope/config.yaml) settings.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use super::error::{ConfigError, ConfigResult};
use super::settings::SettingsFile;

/// Settings level (user or workspace)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLevel {
    /// User-level settings (~/.config/fieldscope/config.yaml)
    User,
    /// Workspace-level settings (.config/fieldscope/config.yaml in workspace root)
    Workspace,
}

impl ConfigLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigLevel::User => "user",
            ConfigLevel::Workspace => "workspace",
        }
    }
}

/// Reads and writes a settings file
///
/// # Example
///
/// ```no_run
/// use fieldscope_core::config::SettingsLoader;
///
/// let user = SettingsLoader::user();
/// let workspace = SettingsLoader::workspace("/path/to/workspace");
/// ```
pub struct SettingsLoader {
    path: PathBuf,
    level: ConfigLevel,
    cache: RwLock<Option<SettingsFile>>,
}

impl SettingsLoader {
    /// Create a loader for a specific path
    pub fn new(path: impl Into<PathBuf>, level: ConfigLevel) -> Self {
        Self {
            path: path.into(),
            level,
            cache: RwLock::new(None),
        }
    }

    /// User-level settings (~/.config/fieldscope/config.yaml)
    pub fn user() -> Self {
        // XDG config directory (~/.config on Linux, ~/Library/Application Support on macOS)
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        Self::new(config_dir.join("fieldscope").join("config.yaml"), ConfigLevel::User)
    }

    /// Workspace-level settings (.config/fieldscope/config.yaml)
    pub fn workspace(workspace_root: impl AsRef<Path>) -> Self {
        let path = workspace_root
            .as_ref()
            .join(".config")
            .join("fieldscope")
            .join("config.yaml");
        Self::new(path, ConfigLevel::Workspace)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn level(&self) -> ConfigLevel {
        self.level
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn load(&self) -> ConfigResult<SettingsFile> {
        if !self.path.exists() {
            return Ok(SettingsFile::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(SettingsFile::default());
        }
        serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::Parse(format!("{} ({}): {}", self.path.display(), self.level.as_str(), e))
        })
    }

    /// Cached settings, reading the file on first use
    ///
    /// A missing file yields empty settings.
    pub fn get_settings(&self) -> ConfigResult<SettingsFile> {
        if let Some(settings) = self.cache.read().as_ref() {
            return Ok(settings.clone());
        }

        let settings = self.load()?;
        *self.cache.write() = Some(settings.clone());
        Ok(settings)
    }

    /// Re-read settings from disk
    pub fn reload(&self) -> ConfigResult<SettingsFile> {
        let settings = self.load()?;
        *self.cache.write() = Some(settings.clone());
        Ok(settings)
    }

    /// Write settings to disk, creating parent directories
    pub fn save(&self, settings: &SettingsFile) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(settings)
            .map_err(|e| ConfigError::Other(format!("Failed to serialize YAML: {}", e)))?;
        fs::write(&self.path, content)?;

        *self.cache.write() = Some(settings.clone());
        Ok(())
    }
}

impl std::fmt::Debug for SettingsLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsLoader")
            .field("path", &self.path)
            .field("level", &self.level)
            .field("exists", &self.exists())
            .finish()
    }
}
