//! Store configuration via TOML.
//!
//! ```toml
//! # Store file, relative to this config file
//! path = "data/db.json"
//! # Indent the JSON output (default: false)
//! pretty = true
//! # Create missing parent directories on save (default: false)
//! create_dirs = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use wormdb_core::error::{DocumentStoreError, DocumentStoreResult};

/// Options for a [`JsonFileStore`](crate::JsonFileStore).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Path of the store file.
    pub path: PathBuf,
    /// Write indented JSON.
    #[serde(default)]
    pub pretty: bool,
    /// Create missing parent directories before writing.
    #[serde(default)]
    pub create_dirs: bool,
}

impl StoreConfig {
    /// Configuration for `path` with every other option at its default.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: false,
            create_dirs: false,
        }
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Configuration`] on malformed TOML, a missing
    /// `path`, or an unknown key.
    pub fn from_toml_str(content: &str) -> DocumentStoreResult<Self> {
        toml::from_str(content)
            .map_err(|e| DocumentStoreError::Configuration(format!("Failed to parse store config: {e}")))
    }

    /// Reads and parses configuration from a file.
    ///
    /// A relative `path` is resolved against the directory containing the config file.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Configuration`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> DocumentStoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DocumentStoreError::Configuration(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let mut config = Self::from_toml_str(&content)?;
        if config.path.is_relative() {
            if let Some(base) = path.parent() {
                config.path = base.join(&config.path);
            }
        }

        Ok(config)
    }
}
