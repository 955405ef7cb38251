//! In-memory storage implementation for document stores.
//!
//! Collections are kept in a plain map of record vectors. Loading and saving are
//! no-ops, so the content lives exactly as long as the backend value.

use wormdb_core::{
    backend::{Collections, StoreBackend, StoreBackendBuilder},
    error::DocumentStoreResult,
};

/// Non-persistent document storage backend.
///
/// # Example
///
/// ```ignore
/// use wormdb_memory::InMemoryStore;
/// use wormdb::backend::StoreBackend;
///
/// let mut store = InMemoryStore::new();
/// store.collections_mut().entry("User".to_string()).or_default();
/// store.save()?;
/// assert!(store.collections().contains_key("User"));
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// The main storage map: collection_name -> records
    collections: Collections,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            collections: Collections::new(),
        }
    }

    /// Creates a store that starts out with `collections`.
    ///
    /// Useful for registering schemas against pre-existing records.
    pub fn with_collections(collections: Collections) -> Self {
        Self { collections }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }
}

impl StoreBackend for InMemoryStore {
    fn collections(&self) -> &Collections {
        &self.collections
    }

    fn collections_mut(&mut self) -> &mut Collections {
        &mut self.collections
    }

    fn load(&mut self) -> DocumentStoreResult<()> {
        // Nothing persisted to load from
        Ok(())
    }

    fn save(&self) -> DocumentStoreResult<()> {
        // Nowhere to persist to
        Ok(())
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
///
/// # Example
///
/// ```ignore
/// use wormdb_memory::InMemoryStore;
/// use wormdb::backend::StoreBackendBuilder;
///
/// let store = InMemoryStore::builder()
///     .collections(seed)
///     .build()?;
/// ```
#[derive(Default)]
pub struct InMemoryStoreBuilder {
    collections: Collections,
}

impl InMemoryStoreBuilder {
    /// Seeds the store with existing collections.
    pub fn collections(mut self, collections: Collections) -> Self {
        self.collections = collections;
        self
    }
}

impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] instance.
    ///
    /// This always succeeds.
    fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::with_collections(self.collections))
    }
}
