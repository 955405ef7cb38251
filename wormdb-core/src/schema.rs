//! Schema registration.
//!
//! A schema is declared once, as an ordered list of `(attribute, Field)` pairs, and
//! registered against a store. Registration resolves field names, picks the primary
//! key, and synthesizes an auto-incrementing `id` primary key when none was declared.
//! The result is an immutable [`Schema`] shared by every document of that type.
//!
//! ```ignore
//! use wormdb::{field::Field, schema::Schema};
//!
//! let users = Schema::builder("User")
//!     .field("name", Field::new())
//!     .field("age", Field::new().with_default(18))
//!     .register(&store)?;
//!
//! assert_eq!(users.id_field(), "id");
//! ```

use serde_json::Value;
use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};
use tracing::info;

use crate::{
    backend::{Record, StoreBackend},
    document::DynDocument,
    error::{DocumentStoreError, DocumentStoreResult},
    field::Field,
    query::Criteria,
    store::DocumentStore,
};

/// Name of the primary key field generated for schemas that do not declare one.
pub const ID_FIELD: &str = "id";

/// Registered, immutable metadata of a document schema.
#[derive(Debug)]
pub struct Schema {
    name: String,
    fields: Vec<(String, Field)>,
    id_field: String,
    next_id_seed: Option<i64>,
    next_id: AtomicI64,
}

impl Schema {
    /// Starts declaring a schema whose documents live in the collection `name`.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// The schema name, which is also its collection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute names and their descriptors, in declaration order.
    ///
    /// A generated `id` field comes first.
    pub fn fields(&self) -> &[(String, Field)] {
        &self.fields
    }

    /// Looks up a field descriptor by attribute name.
    pub fn field(&self, attribute: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(name, _)| name == attribute)
            .map(|(_, field)| field)
    }

    /// Storage name of the primary key field.
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Returns `true` if the primary key was generated rather than declared.
    pub fn is_auto_id(&self) -> bool {
        self.next_id_seed.is_some()
    }

    /// The first id handed out for a generated primary key, computed at registration.
    pub fn next_id_seed(&self) -> Option<i64> {
        self.next_id_seed
    }

    /// Returns the raw records of this schema's collection matching `criteria`.
    ///
    /// This is a pure read of the store's in-memory state.
    pub fn get_raw<'s, B: StoreBackend>(
        &self,
        store: &'s DocumentStore<B>,
        criteria: &Criteria,
    ) -> Vec<&'s Record> {
        store.collection(&self.name).find(criteria)
    }

    /// Returns documents wrapping the records matching `criteria`.
    ///
    /// Record values are copied verbatim, including the persisted primary key.
    pub fn get<B: StoreBackend>(self: &Arc<Self>, store: &DocumentStore<B>, criteria: &Criteria) -> Vec<DynDocument> {
        self.get_raw(store, criteria)
            .into_iter()
            .map(|record| DynDocument::from_record(self, record.clone()))
            .collect()
    }

    /// Hands out the next generated id, or `None` if the primary key is declared.
    ///
    /// The counter saturates at `i64::MAX`: once reached, every new document gets
    /// that id and saving any but the first fails with `DocumentAlreadyExists`.
    pub(crate) fn allocate_id(&self) -> Option<i64> {
        self.next_id_seed.map(|_| {
            self.next_id
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |id| Some(id.saturating_add(1)))
                .unwrap_or_else(|id| id)
        })
    }
}

/// Declaration of a schema, consumed by [`SchemaBuilder::register`].
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<(String, Field)>,
}

impl SchemaBuilder {
    /// Declares an attribute. Declaration order is preserved.
    pub fn field(mut self, attribute: impl Into<String>, field: Field) -> Self {
        self.fields.push((attribute.into(), field));
        self
    }

    /// Processes the declaration against the current content of `store`.
    ///
    /// # Errors
    ///
    /// - [`DocumentStoreError::MultiplePrimaryKey`] if more than one field is a primary key.
    /// - [`DocumentStoreError::InvalidSchema`] if an attribute or storage name is declared
    ///   twice, or if a non-primary `id` field would clash with the generated one.
    ///
    /// Nothing is registered when an error is returned.
    pub fn register<B: StoreBackend>(self, store: &DocumentStore<B>) -> DocumentStoreResult<Arc<Schema>> {
        let SchemaBuilder { name, fields: declared } = self;

        let mut fields: Vec<(String, Field)> = Vec::with_capacity(declared.len() + 1);
        let mut id_field = None;

        for (attribute, mut field) in declared {
            field.resolve_name(&attribute);

            if fields.iter().any(|(existing, other)| *existing == attribute || other.name() == field.name()) {
                return Err(DocumentStoreError::InvalidSchema(format!(
                    "field `{attribute}` is declared twice in schema {name}"
                )));
            }

            if field.is_primary_key() {
                if id_field.is_some() {
                    return Err(DocumentStoreError::MultiplePrimaryKey(name));
                }
                id_field = field.name().map(str::to_string);
            }

            fields.push((attribute, field));
        }

        let (id_field, next_id_seed) = match id_field {
            Some(id_field) => (id_field, None),
            None => {
                if fields.iter().any(|(attribute, field)| attribute == ID_FIELD || field.name() == Some(ID_FIELD)) {
                    return Err(DocumentStoreError::InvalidSchema(format!(
                        "schema {name} declares a non-primary `{ID_FIELD}` field but no primary key"
                    )));
                }

                fields.insert(0, (ID_FIELD.to_string(), Field::new().named(ID_FIELD).primary_key(true)));
                (ID_FIELD.to_string(), Some(next_id(store.collection(&name).records())))
            }
        };

        info!(
            target: "wormdb::schema",
            schema = %name,
            id_field = %id_field,
            next_id = ?next_id_seed,
            fields = fields.len(),
            "Registered schema"
        );

        Ok(Arc::new(Schema {
            name,
            fields,
            id_field,
            next_id: AtomicI64::new(next_id_seed.unwrap_or_default()),
            next_id_seed,
        }))
    }
}

/// One more than the largest numeric `id` among `records`, or 1.
///
/// Falls back to 1 when there are no records or when any record lacks a numeric `id`.
fn next_id(records: &[Record]) -> i64 {
    records
        .iter()
        .map(|record| record.get(ID_FIELD).and_then(numeric_id))
        .collect::<Option<Vec<_>>>()
        .and_then(|ids| ids.into_iter().max())
        .map_or(1, |max| max.saturating_add(1))
}

/// Integer part of a numeric id, clamped to the `i64` range.
fn numeric_id(value: &Value) -> Option<i64> {
    let Value::Number(number) = value else {
        return None;
    };

    number
        .as_i64()
        .or_else(|| number.as_u64().map(|_| i64::MAX))
        .or_else(|| number.as_f64().map(|id| id.floor() as i64))
}
