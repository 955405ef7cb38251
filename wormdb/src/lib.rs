//! Main wormdb crate: a tiny embedded document store kept in a single JSON file.
//!
//! This crate is the primary entry point for users of wormdb. It re-exports the core
//! types from the sub-crates and gives access to the storage backends.
//!
//! # Features
//!
//! - **Declared schemas** - Describe attributes with `#[document]` and [`field::Field`]
//! - **Auto-increment ids** - Schemas without a primary key get an integer `id`
//! - **Write-through** - Every save, update and delete rewrites the backing store
//! - **Equality queries** - Exact-match filtering with [`criteria!`]
//!
//! # Quick Start
//!
//! ```ignore
//! use wormdb::{prelude::*, json::JsonFileStore};
//!
//! #[document]
//! pub struct User {
//!     name: Field,
//!     #[field(default = 18)]
//!     age: Field,
//! }
//!
//! fn main() -> DocumentStoreResult<()> {
//!     let mut store = DocumentStore::new(JsonFileStore::open("db.json")?);
//!     let users = store.register::<User>()?;
//!
//!     let mut alice = users.create();
//!     alice.set_name("Alice")?;
//!     alice.save(&mut store)?;
//!
//!     let found = users.get(&store, &criteria!(name = "Alice"));
//!     assert_eq!(found[0].id(), alice.id());
//!
//!     alice.set_age(31)?;
//!     alice.update(&mut store)?;
//!     alice.delete(&mut store)?;
//!
//!     store.shutdown()
//! }
//! ```
//!
//! # Backends
//!
//! - [`json`] - The JSON file store (requires the `json` feature, on by default)
//! - [`memory`] - Non-persistent storage for tests and scratch data

#[allow(unused_extern_crates)]
extern crate self as wormdb;

pub mod prelude;

pub use wormdb_core::{backend, collection, document, error, field, query, schema, store};

pub use wormdb_macros::document;

// Re-exported for the code generated by `#[document]`
pub use serde_json;

/// In-memory storage backend implementations.
pub mod memory {
    pub use wormdb_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// JSON file storage backend implementations.
///
/// This module is only available when the `json` feature is enabled.
#[cfg(feature = "json")]
pub mod json {
    pub use wormdb_json::{JsonFileStore, JsonFileStoreBuilder, StoreConfig};
}

/// Builds a [`Criteria`](query::Criteria) from named equality conditions.
///
/// ```ignore
/// let adults = users.get(&store, &criteria!(age = 18, city = "Oslo"));
/// let everyone = users.get(&store, &criteria!());
/// let spaced = users.get(&store, &criteria!("full name" => "Ada Lovelace"));
/// ```
#[macro_export]
macro_rules! criteria {
    () => {
        $crate::query::Criteria::new()
    };
    ($($field:ident = $value:expr),+ $(,)?) => {
        $crate::query::Criteria::new()$(.eq(stringify!($field), $value))+
    };
    ($($field:literal => $value:expr),+ $(,)?) => {
        $crate::query::Criteria::new()$(.eq($field, $value))+
    };
}
