//! Main document store interface.
//!
//! [`DocumentStore`] owns a [`StoreBackend`] and is the explicit handle every
//! document operation goes through. Reads borrow it shared; writes borrow it
//! mutably and save the backend before returning.
//!
//! # Example
//!
//! ```ignore
//! use wormdb::{prelude::*, json::JsonFileStore};
//!
//! let mut store = DocumentStore::new(JsonFileStore::open("db.json")?);
//! let users = store.register::<User>()?;
//!
//! let mut alice = users.create();
//! alice.set_name("Alice")?;
//! alice.save(&mut store)?;
//! ```

use tracing::debug;

use crate::{
    backend::{Record, StoreBackend},
    collection::{Collection, TypedCollection},
    document::Document,
    error::{DocumentStoreError, DocumentStoreResult},
};

/// A document store bound to a specific backend implementation.
///
/// # Type Parameters
///
/// * `B` - The backend implementation type
#[derive(Debug)]
pub struct DocumentStore<B: StoreBackend> {
    backend: B,
}

impl<B: StoreBackend> DocumentStore<B> {
    /// Creates a new document store with the given backend.
    ///
    /// The backend is used as-is; builders and `open` constructors have already
    /// performed the initial load.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Returns the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Registers the schema declared by `D` and returns its typed collection.
    ///
    /// The auto-increment seed for schemas without an explicit primary key is read
    /// from this store now, not when documents are later saved.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::MultiplePrimaryKey`] or
    /// [`DocumentStoreError::InvalidSchema`] if the declaration is malformed.
    pub fn register<D: Document>(&self) -> DocumentStoreResult<TypedCollection<D>> {
        Ok(TypedCollection::new(D::declare().register(self)?))
    }

    /// Gets a read-only view of the collection with the given name.
    ///
    /// The view exists even if the collection does not; it is then empty.
    pub fn collection<'a>(&'a self, name: &str) -> Collection<'a> {
        Collection::new(name.to_string(), self.backend.collections().get(name))
    }

    /// Lists the names of all collections in the store, in store order.
    pub fn list_collections(&self) -> Vec<String> {
        self.backend
            .collections()
            .keys()
            .cloned()
            .collect()
    }

    /// Removes a collection and all of its records, then saves.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::CollectionNotFound`] if there is no such collection,
    /// or the backend's error if saving fails (the collection is restored in memory).
    pub fn drop_collection(&mut self, name: &str) -> DocumentStoreResult<()> {
        let (index, key, records) = self
            .backend
            .collections_mut()
            .shift_remove_full(name)
            .ok_or_else(|| DocumentStoreError::CollectionNotFound(name.to_string()))?;

        if let Err(err) = self.flush() {
            self.backend
                .collections_mut()
                .shift_insert(index, key, records);
            return Err(err);
        }

        debug!(target: "wormdb::document", collection = name, "Dropped collection");
        Ok(())
    }

    /// Discards the in-memory state and loads it again from the backend.
    pub fn reload(&mut self) -> DocumentStoreResult<()> {
        self.backend.load()
    }

    /// Saves the entire in-memory state through the backend.
    pub fn flush(&self) -> DocumentStoreResult<()> {
        self.backend.save()
    }

    /// Shuts down the store and releases backend resources.
    pub fn shutdown(self) -> DocumentStoreResult<()> {
        self.backend.shutdown()
    }

    /// Mutable access to a collection's records, creating the collection if needed.
    pub(crate) fn records_mut(&mut self, name: &str) -> &mut Vec<Record> {
        self.backend
            .collections_mut()
            .entry(name.to_string())
            .or_default()
    }

    /// Removes a collection left empty by a rolled-back insert.
    pub(crate) fn prune_if_empty(&mut self, name: &str) {
        let collections = self.backend.collections_mut();
        if collections.get(name).is_some_and(Vec::is_empty) {
            collections.shift_remove(name);
        }
    }
}
