//! Collection views over a document store.
//!
//! - [`Collection`] - Read-only view of one named collection's raw records
//! - [`TypedCollection`] - A registered document type, used to create and query its documents
//!
//! # Example
//!
//! ```ignore
//! use wormdb::prelude::*;
//!
//! let users = store.register::<User>()?;
//! let alices = users.get(&store, &criteria!(name = "Alice"));
//! let everyone = store.collection("User").records();
//! ```

use std::{fmt, marker::PhantomData, sync::Arc};

use crate::{
    backend::{Record, StoreBackend},
    document::{Document, DynDocument},
    query::Criteria,
    schema::Schema,
    store::DocumentStore,
};

/// A read-only view of a collection's raw records.
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the store borrow
#[derive(Debug, Clone)]
pub struct Collection<'a> {
    name: String,
    records: Option<&'a Vec<Record>>,
}

impl<'a> Collection<'a> {
    pub(crate) fn new(name: String, records: Option<&'a Vec<Record>>) -> Self {
        Self { name, records }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if the collection is present in the store, even when empty.
    pub fn exists(&self) -> bool {
        self.records.is_some()
    }

    /// All records, in insertion order.
    pub fn records(&self) -> &'a [Record] {
        self.records
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Records matching `criteria`, in insertion order.
    ///
    /// Returns an empty vector if the collection does not exist.
    pub fn find(&self, criteria: &Criteria) -> Vec<&'a Record> {
        criteria.filter(self.records())
    }

    /// Index of the first record matching `criteria`.
    pub fn position(&self, criteria: &Criteria) -> Option<usize> {
        self.records()
            .iter()
            .position(|record| criteria.matches(record))
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

/// A registered document type.
///
/// Obtained from [`DocumentStore::register`]. Holds the immutable schema that
/// every document created through it shares.
pub struct TypedCollection<D: Document> {
    schema: Arc<Schema>,
    _marker: PhantomData<fn() -> D>,
}

impl<D: Document> TypedCollection<D> {
    pub(crate) fn new(schema: Arc<Schema>) -> Self {
        Self { schema, _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        self.schema.name()
    }

    /// Returns the registered schema.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Creates a new, unsaved document.
    ///
    /// For schemas with a generated `id`, the document already carries the next id.
    pub fn create(&self) -> D {
        D::from_dyn(DynDocument::new(&self.schema))
    }

    /// Returns the raw records matching `criteria`.
    pub fn get_raw<'s, B: StoreBackend>(
        &self,
        store: &'s DocumentStore<B>,
        criteria: &Criteria,
    ) -> Vec<&'s Record> {
        self.schema.get_raw(store, criteria)
    }

    /// Returns typed documents for the records matching `criteria`.
    pub fn get<B: StoreBackend>(&self, store: &DocumentStore<B>, criteria: &Criteria) -> Vec<D> {
        self.schema
            .get(store, criteria)
            .into_iter()
            .map(D::from_dyn)
            .collect()
    }
}

impl<D: Document> Clone for TypedCollection<D> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.schema))
    }
}

impl<D: Document> fmt::Debug for TypedCollection<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedCollection")
            .field("schema", &self.schema)
            .finish()
    }
}
