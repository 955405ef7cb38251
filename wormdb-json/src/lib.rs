//! JSON file backend for wormdb.
//!
//! This crate provides a file-based implementation of the `StoreBackend` trait. The
//! whole store lives in one JSON file whose top level maps collection names to arrays
//! of record objects:
//!
//! ```json
//! { "User": [ { "id": 1, "name": "Alice" }, { "id": 2, "name": "Bob" } ] }
//! ```
//!
//! The file is read in full when the store is opened and rewritten in full after every
//! mutation. There is no write-ahead log and no locking: a crash mid-write can leave a
//! truncated file, and two processes writing the same file will overwrite each other.
//!
//! # Example
//!
//! ```ignore
//! use wormdb::{backend::StoreBackendBuilder, json::JsonFileStore};
//!
//! let backend = JsonFileStore::builder()
//!     .path("data/db.json")
//!     .pretty(true)
//!     .create_dirs(true)
//!     .build()?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as wormdb_json;

pub mod config;
pub mod store;

pub use config::StoreConfig;
pub use store::{JsonFileStore, JsonFileStoreBuilder};
