//! Error types and result types for document store operations.
//!
//! Every fallible operation in the workspace returns [`DocumentStoreResult<T>`].
//! Nothing is retried and nothing is swallowed, with one exception: a zero-byte
//! store file loads as an empty store instead of failing to parse.

use serde_json::Error as SerdeJsonError;
use std::{io, path::PathBuf};
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with a document store.
#[derive(Error, Debug)]
pub enum DocumentStoreError {
    /// The backing file is non-empty but does not hold a mapping of
    /// collection names to arrays of records.
    #[error("Corrupt store {}: {reason}", path.display())]
    CorruptStore {
        /// Path of the offending file.
        path: PathBuf,
        /// Parser message describing what was wrong.
        reason: String,
    },
    /// The backing file could not be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// A schema declared more than one primary key field.
    /// The argument is the schema name.
    #[error("Schema {0} cannot have more than one primary key field")]
    MultiplePrimaryKey(String),
    /// A document with the given primary key value already exists in the collection.
    /// The first argument is the primary key value, the second is the collection name.
    #[error("Document {0} already exists in collection {1}")]
    DocumentAlreadyExists(String, String),
    /// No document with the given primary key value exists in the collection.
    /// The first argument is the primary key value, the second is the collection name.
    #[error("Document {0} does not exist in collection {1}")]
    DocumentDoesNotExist(String, String),
    /// The requested collection does not exist in the store.
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),
    /// The schema declaration is malformed in a way other than multiple primary keys.
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
    /// The document is missing its primary key or was addressed through an unknown attribute.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// Serialization error when encoding the store.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// The store configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// A specialized `Result` type for document store operations.
pub type DocumentStoreResult<T> = Result<T, DocumentStoreError>;

impl DocumentStoreError {
    pub(crate) fn already_exists(pk: &serde_json::Value, collection: &str) -> Self {
        DocumentStoreError::DocumentAlreadyExists(pk.to_string(), collection.to_string())
    }

    pub(crate) fn does_not_exist(pk: &serde_json::Value, collection: &str) -> Self {
        DocumentStoreError::DocumentDoesNotExist(pk.to_string(), collection.to_string())
    }

    /// Wraps an I/O error together with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        DocumentStoreError::Io { path: path.into(), source }
    }
}

impl From<SerdeJsonError> for DocumentStoreError {
    fn from(err: SerdeJsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}
