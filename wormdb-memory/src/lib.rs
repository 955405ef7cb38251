//! In-memory document storage backend for wormdb.
//!
//! This crate provides an implementation of the `StoreBackend` trait that never
//! touches the disk. Documents behave exactly as they do against the JSON file
//! backend, which makes it the backend of choice for tests and scratch data.
//!
//! # Quick Start
//!
//! ```ignore
//! use wormdb::{prelude::*, memory::InMemoryStore};
//!
//! #[document]
//! pub struct User {
//!     name: Field,
//! }
//!
//! fn main() -> DocumentStoreResult<()> {
//!     let mut store = DocumentStore::new(InMemoryStore::builder().build()?);
//!     let users = store.register::<User>()?;
//!
//!     let mut alice = users.create();
//!     alice.set_name("Alice")?;
//!     alice.save(&mut store)?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as wormdb_memory;

pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
