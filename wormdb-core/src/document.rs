//! Document instances and their lifecycle operations.
//!
//! [`DynDocument`] is the schema-tagged, record-backed instance every document is
//! built on. Its four store operations (`save`, `update`, `delete`, plus the queries
//! on [`Schema`]) are keyed on the schema's primary key and write the whole store
//! through the backend before returning.
//!
//! Typed documents implement [`Document`], normally through the `#[document]`
//! attribute macro, and get the same lifecycle methods from [`DocumentExt`].

use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::{
    backend::{Record, StoreBackend},
    error::{DocumentStoreError, DocumentStoreResult},
    query::Criteria,
    schema::{Schema, SchemaBuilder},
    store::DocumentStore,
};

/// A document of some registered schema, holding its values in a private record.
///
/// # Example
///
/// ```ignore
/// let mut alice = DynDocument::new(&users);
/// alice.set("name", "Alice")?;
/// alice.save(&mut store)?;
///
/// assert_eq!(alice.get("id"), Some(&json!(1)));
/// ```
#[derive(Debug, Clone)]
pub struct DynDocument {
    schema: Arc<Schema>,
    data: Record,
}

impl DynDocument {
    /// Creates a default document of `schema`.
    ///
    /// If the schema's primary key is generated, the document is given the next id
    /// right away; no other attribute is set.
    pub fn new(schema: &Arc<Schema>) -> Self {
        let mut data = Record::new();
        if let Some(id) = schema.allocate_id() {
            data.insert(schema.id_field().to_string(), Value::from(id));
        }

        Self {
            schema: Arc::clone(schema),
            data,
        }
    }

    /// Wraps a stored record, copying its values verbatim.
    pub(crate) fn from_record(schema: &Arc<Schema>, record: Record) -> Self {
        Self {
            schema: Arc::clone(schema),
            data: record,
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// The collection this document is stored in.
    pub fn collection_name(&self) -> &str {
        self.schema.name()
    }

    /// Storage name of the primary key field.
    pub fn pk(&self) -> &str {
        self.schema.id_field()
    }

    /// Current primary key value, if set.
    pub fn pk_value(&self) -> Option<&Value> {
        self.data.get(self.pk())
    }

    /// The document's values as a raw record.
    pub fn to_dict(&self) -> &Record {
        &self.data
    }

    pub fn into_record(self) -> Record {
        self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut Record {
        &mut self.data
    }

    /// Reads an attribute by its declared name.
    ///
    /// Returns `None` for attributes that were never set and for unknown attributes.
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.schema.field(attribute)?.get(self)
    }

    /// Assigns an attribute by its declared name, applying the field default to null.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::InvalidDocument`] if the schema has no such attribute.
    pub fn set(&mut self, attribute: &str, value: impl Into<Value>) -> DocumentStoreResult<()> {
        let schema = Arc::clone(&self.schema);
        let field = schema.field(attribute).ok_or_else(|| {
            DocumentStoreError::InvalidDocument(format!(
                "schema {} has no attribute `{attribute}`",
                schema.name()
            ))
        })?;

        field.set(self, value)
    }

    /// Inserts this document as a new record, then saves the store.
    ///
    /// # Errors
    ///
    /// - [`DocumentStoreError::DocumentAlreadyExists`] if a record with the same primary
    ///   key value is present; nothing is written.
    /// - [`DocumentStoreError::InvalidDocument`] if the primary key is unset.
    /// - The backend's error if saving fails; the in-memory insert is rolled back.
    pub fn save<B: StoreBackend>(&self, store: &mut DocumentStore<B>) -> DocumentStoreResult<()> {
        let (criteria, pk) = self.pk_criteria()?;
        let name = self.collection_name();

        let collection = store.collection(name);
        if collection.position(&criteria).is_some() {
            return Err(DocumentStoreError::already_exists(pk, name));
        }
        let existed = collection.exists();

        store.records_mut(name).push(self.data.clone());

        if let Err(err) = store.flush() {
            store.records_mut(name).pop();
            if !existed {
                store.prune_if_empty(name);
            }
            return Err(err);
        }

        debug!(target: "wormdb::document", collection = name, pk = %pk, "Saved document");
        Ok(())
    }

    /// Merges this document's values into the stored record with the same primary key,
    /// then saves the store.
    ///
    /// The merge is a shallow, key-wise overwrite: keys present only in the stored
    /// record are kept.
    ///
    /// # Errors
    ///
    /// - [`DocumentStoreError::DocumentDoesNotExist`] if no record has this primary key
    ///   value; nothing is written.
    /// - [`DocumentStoreError::InvalidDocument`] if the primary key is unset.
    /// - The backend's error if saving fails; the stored record is restored in memory.
    pub fn update<B: StoreBackend>(&self, store: &mut DocumentStore<B>) -> DocumentStoreResult<()> {
        let (criteria, pk) = self.pk_criteria()?;
        let name = self.collection_name();

        let index = store
            .collection(name)
            .position(&criteria)
            .ok_or_else(|| DocumentStoreError::does_not_exist(pk, name))?;

        let record = &mut store.records_mut(name)[index];
        let previous = record.clone();
        for (key, value) in &self.data {
            record.insert(key.clone(), value.clone());
        }

        if let Err(err) = store.flush() {
            store.records_mut(name)[index] = previous;
            return Err(err);
        }

        debug!(target: "wormdb::document", collection = name, pk = %pk, "Updated document");
        Ok(())
    }

    /// Removes the first stored record with this primary key value, then saves the store.
    ///
    /// # Errors
    ///
    /// - [`DocumentStoreError::DocumentDoesNotExist`] if no record has this primary key
    ///   value; nothing is written.
    /// - [`DocumentStoreError::InvalidDocument`] if the primary key is unset.
    /// - The backend's error if saving fails; the record is put back in memory.
    pub fn delete<B: StoreBackend>(&self, store: &mut DocumentStore<B>) -> DocumentStoreResult<()> {
        let (criteria, pk) = self.pk_criteria()?;
        let name = self.collection_name();

        let index = store
            .collection(name)
            .position(&criteria)
            .ok_or_else(|| DocumentStoreError::does_not_exist(pk, name))?;

        let removed = store.records_mut(name).remove(index);

        if let Err(err) = store.flush() {
            store.records_mut(name).insert(index, removed);
            return Err(err);
        }

        debug!(target: "wormdb::document", collection = name, pk = %pk, "Deleted document");
        Ok(())
    }

    /// Criteria selecting records with this document's primary key value.
    fn pk_criteria(&self) -> DocumentStoreResult<(Criteria, &Value)> {
        let pk = self.pk_value().ok_or_else(|| {
            DocumentStoreError::InvalidDocument(format!(
                "primary key `{}` of {} is not set",
                self.pk(),
                self.collection_name()
            ))
        })?;

        Ok((Criteria::new().eq(self.pk(), pk.clone()), pk))
    }
}

/// Core trait implemented by typed document schemas.
///
/// Implementations wrap a [`DynDocument`] and describe their schema through
/// [`Document::declare`]. The `#[document]` attribute macro generates both, plus
/// an accessor pair per attribute.
///
/// # Example
///
/// ```ignore
/// use wormdb::prelude::*;
///
/// #[document]
/// pub struct User {
///     name: Field,
///     #[field(default = 18)]
///     age: Field,
/// }
///
/// let users = store.register::<User>()?;
/// let mut bob = users.create();
/// bob.set_name("Bob")?;
/// bob.save(&mut store)?;
/// ```
pub trait Document: Sized + 'static {
    /// Returns the name of the collection this document belongs to.
    fn collection_name() -> &'static str;

    /// Declares the schema's attributes, to be registered against a store.
    fn declare() -> SchemaBuilder;

    fn from_dyn(document: DynDocument) -> Self;

    fn as_dyn(&self) -> &DynDocument;

    fn as_dyn_mut(&mut self) -> &mut DynDocument;

    fn into_dyn(self) -> DynDocument;
}

/// Lifecycle operations for typed documents.
///
/// This trait is automatically implemented for all types that implement [`Document`]
/// and forwards to the wrapped [`DynDocument`].
pub trait DocumentExt: Document {
    /// See [`DynDocument::save`].
    fn save<B: StoreBackend>(&self, store: &mut DocumentStore<B>) -> DocumentStoreResult<()>;

    /// See [`DynDocument::update`].
    fn update<B: StoreBackend>(&self, store: &mut DocumentStore<B>) -> DocumentStoreResult<()>;

    /// See [`DynDocument::delete`].
    fn delete<B: StoreBackend>(&self, store: &mut DocumentStore<B>) -> DocumentStoreResult<()>;

    /// The document's values as a raw record.
    fn to_dict(&self) -> &Record;

    /// Storage name of the primary key field.
    fn pk(&self) -> &str;

    /// Current primary key value, if set.
    fn pk_value(&self) -> Option<&Value>;
}

impl<D: Document> DocumentExt for D {
    fn save<B: StoreBackend>(&self, store: &mut DocumentStore<B>) -> DocumentStoreResult<()> {
        self.as_dyn().save(store)
    }

    fn update<B: StoreBackend>(&self, store: &mut DocumentStore<B>) -> DocumentStoreResult<()> {
        self.as_dyn().update(store)
    }

    fn delete<B: StoreBackend>(&self, store: &mut DocumentStore<B>) -> DocumentStoreResult<()> {
        self.as_dyn().delete(store)
    }

    fn to_dict(&self) -> &Record {
        self.as_dyn().to_dict()
    }

    fn pk(&self) -> &str {
        self.as_dyn().pk()
    }

    fn pk_value(&self) -> Option<&Value> {
        self.as_dyn().pk_value()
    }
}
