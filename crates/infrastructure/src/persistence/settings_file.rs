//! Scan settings files.
//!
//! Settings are read from JSON or YAML, picked by file extension. Without an
//! explicit path the loader looks in the platform config directory:
//! - Linux/macOS: ~/.config/apihawk/settings.json
//! - Windows: %APPDATA%/apihawk/settings.json

use std::path::{Path, PathBuf};

use apihawk_domain::ScanSettings;
use tokio::fs;

use crate::serialization::{SerializationError, from_json_bytes};

/// Error type for settings operations.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// IO error during file operations.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// JSON deserialization error.
    #[error("invalid settings in {}: {source}", path.display())]
    Json {
        /// File that was parsed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: SerializationError,
    },

    /// YAML deserialization error.
    #[error("invalid settings in {}: {source}", path.display())]
    Yaml {
        /// File that was parsed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_yaml::Error,
    },
}

/// Loader for [`ScanSettings`] files.
#[derive(Debug, Clone, Default)]
pub struct SettingsFile;

impl SettingsFile {
    /// Creates a new settings loader.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns the path of the default settings file, if the platform has a
    /// config directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("apihawk").join("settings.json"))
    }

    /// Loads settings from `path`.
    ///
    /// Files ending in `.yaml` or `.yml` are parsed as YAML, everything else
    /// as JSON. Missing keys take their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load(&self, path: &Path) -> Result<ScanSettings, SettingsError> {
        let content = fs::read(path).await.map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if is_yaml(path) {
            serde_yaml::from_slice(&content).map_err(|source| SettingsError::Yaml {
                path: path.to_path_buf(),
                source,
            })
        } else {
            from_json_bytes(&content).map_err(|source| SettingsError::Json {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    /// Loads settings from the default location.
    ///
    /// Returns default settings if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load_default(&self) -> Result<ScanSettings, SettingsError> {
        let Some(path) = Self::default_path() else {
            return Ok(ScanSettings::default());
        };

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(ScanSettings::default());
        }

        self.load(&path).await
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}
