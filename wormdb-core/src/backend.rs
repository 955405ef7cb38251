//! Storage backend abstraction for the document store.
//!
//! A backend owns the in-memory mapping from collection name to records and knows how
//! to load that mapping from, and save it to, wherever it persists. The document layer
//! never talks to the disk itself: it mutates [`StoreBackend::collections_mut`] and then
//! calls [`StoreBackend::save`] before returning, which makes every write-type operation
//! write-through.
//!
//! # Traits
//!
//! - [`StoreBackend`]: The core trait for storage backends
//! - [`StoreBackendBuilder`]: Factory trait for creating backend instances
//!
//! # Examples
//!
//! ```ignore
//! use wormdb::backend::StoreBackend;
//! use serde_json::json;
//!
//! let mut backend = MyBackendImpl::new();
//! backend
//!     .collections_mut()
//!     .entry("User".to_string())
//!     .or_default()
//!     .push(json!({ "id": 1, "name": "Alice" }).as_object().cloned().unwrap());
//! backend.save()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt::Debug;

use crate::error::DocumentStoreResult;

/// A raw, schema-less record: field name to JSON value, in insertion order.
pub type Record = Map<String, Value>;

/// The whole store: collection name to the ordered records of that collection.
///
/// Collections keep the order in which they were first created or loaded.
pub type Collections = IndexMap<String, Vec<Record>>;

/// Abstract interface for document storage backends.
///
/// Implementations are synchronous and are not expected to guard against
/// concurrent writers. A store is used by a single writer in a single process;
/// two processes sharing one backing file race with no detection.
///
/// # Error Handling
///
/// `load` and `save` return [`DocumentStoreResult<T>`](crate::error::DocumentStoreResult).
/// File-backed implementations report unreadable or unwritable paths as
/// [`DocumentStoreError::Io`](crate::error::DocumentStoreError::Io) and unparsable
/// content as [`DocumentStoreError::CorruptStore`](crate::error::DocumentStoreError::CorruptStore).
pub trait StoreBackend: Debug {
    /// Returns the in-memory collection mapping.
    fn collections(&self) -> &Collections;

    /// Returns the in-memory collection mapping for mutation.
    ///
    /// Changes made through this reference are not durable until [`save`](Self::save)
    /// returns successfully.
    fn collections_mut(&mut self) -> &mut Collections;

    /// Replaces the in-memory mapping with the persisted content.
    ///
    /// An absent or zero-byte source leaves the store empty.
    fn load(&mut self) -> DocumentStoreResult<()>;

    /// Persists the entire in-memory mapping, overwriting what was there.
    fn save(&self) -> DocumentStoreResult<()>;

    /// Cleanly shuts down the backend, releasing all resources.
    ///
    /// The default implementation is a no-op. Every mutation has already been
    /// saved, so there is nothing left to flush.
    fn shutdown(self) -> DocumentStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

impl<B> StoreBackend for &mut B
where
    B: StoreBackend,
{
    fn collections(&self) -> &Collections {
        (**self).collections()
    }

    fn collections_mut(&mut self) -> &mut Collections {
        (**self).collections_mut()
    }

    fn load(&mut self) -> DocumentStoreResult<()> {
        (**self).load()
    }

    fn save(&self) -> DocumentStoreResult<()> {
        (**self).save()
    }
}

/// Factory trait for backends that need configuration before use.
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    /// Builds the backend, performing its initial load.
    fn build(self) -> DocumentStoreResult<Self::Backend>;
}
