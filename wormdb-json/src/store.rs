//! The JSON file store.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};
use wormdb_core::{
    backend::{Collections, StoreBackend, StoreBackendBuilder},
    error::{DocumentStoreError, DocumentStoreResult},
};

use crate::config::StoreConfig;

/// Document storage backend persisted to a single JSON file.
///
/// The in-memory collections and the file converge after every successful
/// [`save`](StoreBackend::save).
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    pretty: bool,
    create_dirs: bool,
    collections: Collections,
}

impl JsonFileStore {
    /// Opens the store at `path`, loading it if the file exists.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::CorruptStore`] if the file is non-empty and not a
    /// valid store, or [`DocumentStoreError::Io`] if it cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> DocumentStoreResult<Self> {
        Self::builder().path(path).build()
    }

    /// Creates a builder for constructing a `JsonFileStore` with custom options.
    pub fn builder() -> JsonFileStoreBuilder {
        JsonFileStoreBuilder::default()
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_collections(path: &Path) -> DocumentStoreResult<Option<Collections>> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(DocumentStoreError::io(path, err)),
        };

        // An existing but empty file is an empty store
        if bytes.is_empty() {
            return Ok(None);
        }

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|err| {
                warn!(target: "wormdb::json", path = %path.display(), error = %err, "Store file is corrupt");
                DocumentStoreError::CorruptStore {
                    path: path.to_path_buf(),
                    reason: err.to_string(),
                }
            })
    }
}

impl StoreBackend for JsonFileStore {
    fn collections(&self) -> &Collections {
        &self.collections
    }

    fn collections_mut(&mut self) -> &mut Collections {
        &mut self.collections
    }

    fn load(&mut self) -> DocumentStoreResult<()> {
        self.collections = Self::read_collections(&self.path)?.unwrap_or_default();

        debug!(
            target: "wormdb::json",
            path = %self.path.display(),
            collections = self.collections.len(),
            "Loaded store"
        );

        Ok(())
    }

    fn save(&self) -> DocumentStoreResult<()> {
        if self.create_dirs {
            if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|err| DocumentStoreError::io(parent, err))?;
            }
        }

        let bytes = if self.pretty {
            serde_json::to_vec_pretty(&self.collections)?
        } else {
            serde_json::to_vec(&self.collections)?
        };

        fs::write(&self.path, &bytes).map_err(|err| DocumentStoreError::io(&self.path, err))?;

        debug!(
            target: "wormdb::json",
            path = %self.path.display(),
            collections = self.collections.len(),
            bytes = bytes.len(),
            "Saved store"
        );

        Ok(())
    }
}

/// Builder for constructing [`JsonFileStore`] instances.
///
/// # Example
///
/// ```ignore
/// use wormdb_json::JsonFileStore;
/// use wormdb::backend::StoreBackendBuilder;
///
/// let store = JsonFileStore::builder()
///     .path("db.json")
///     .pretty(true)
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct JsonFileStoreBuilder {
    path: Option<PathBuf>,
    pretty: bool,
    create_dirs: bool,
}

impl JsonFileStoreBuilder {
    /// Takes every option from a loaded [`StoreConfig`].
    pub fn from_config(config: StoreConfig) -> Self {
        Self {
            path: Some(config.path),
            pretty: config.pretty,
            create_dirs: config.create_dirs,
        }
    }

    /// Sets the store file path. Required.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Writes indented JSON instead of a single line.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Creates missing parent directories before each write.
    pub fn create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }
}

impl StoreBackendBuilder for JsonFileStoreBuilder {
    type Backend = JsonFileStore;

    /// Builds the store and loads the file if it exists.
    ///
    /// The file is not created until the first save.
    fn build(self) -> DocumentStoreResult<Self::Backend> {
        let path = self.path.ok_or_else(|| {
            DocumentStoreError::Configuration("a store file path is required".to_string())
        })?;

        let mut store = JsonFileStore {
            path,
            pretty: self.pretty,
            create_dirs: self.create_dirs,
            collections: Collections::new(),
        };
        store.load()?;

        Ok(store)
    }
}
