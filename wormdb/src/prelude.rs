//! Convenient re-exports of commonly used types from wormdb.
//!
//! ```ignore
//! use wormdb::prelude::*;
//! ```
//!
//! This provides access to:
//! - The `#[document]` macro, document traits and [`DynDocument`]
//! - Field and schema declaration
//! - Store backends and builders
//! - Equality criteria
//! - Error types

pub use wormdb_core::{
    backend::{Record, StoreBackend, StoreBackendBuilder},
    collection::{Collection, TypedCollection},
    document::{Document, DocumentExt, DynDocument},
    error::{DocumentStoreError, DocumentStoreResult},
    field::Field,
    query::Criteria,
    schema::{Schema, SchemaBuilder},
    store::DocumentStore,
};

pub use wormdb_macros::document;

pub use crate::criteria;
