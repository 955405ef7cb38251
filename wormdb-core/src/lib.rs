//! A tiny embedded document store: one JSON file, many typed collections.
//!
//! This crate is the core of the wormdb project and provides:
//!
//! - **Store backend abstraction** ([`backend`]) - The load/save contract backends implement
//! - **Field descriptors** ([`field`]) - Declared attributes with primary key and default policy
//! - **Schema registration** ([`schema`]) - Field collection and auto-increment `id` synthesis
//! - **Documents** ([`document`]) - Record-backed instances with save, update and delete
//! - **Collections** ([`collection`]) - Raw and typed views used for querying
//! - **Equality criteria** ([`query`]) - Exact-match filters evaluated by linear scan
//! - **Document store** ([`store`]) - The explicit handle all operations go through
//! - **Error handling** ([`error`]) - Error types and result types
//!
//! # Example
//!
//! ```ignore
//! use wormdb::{prelude::*, json::JsonFileStore};
//!
//! #[document]
//! pub struct User {
//!     name: Field,
//! }
//!
//! let mut store = DocumentStore::new(JsonFileStore::open("db.json")?);
//! let users = store.register::<User>()?;
//!
//! let mut alice = users.create();
//! alice.set_name("Alice")?;
//! alice.save(&mut store)?;
//!
//! assert_eq!(users.get(&store, &criteria!(id = 1)).len(), 1);
//! ```

#[allow(unused_extern_crates)]
extern crate self as wormdb_core;

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod field;
pub mod query;
pub mod schema;
pub mod store;
