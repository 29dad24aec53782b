//! Persistent string key-value stores backing conversation history.

pub mod error;
pub mod file;
pub mod kv;
pub mod memory;
pub mod sqlite;

/// Store error type.
pub use error::StoreError;
/// One JSON document per key under a directory.
pub use file::FileStore;
/// Key-value store interface.
pub use kv::KeyValueStore;
/// Process-local store.
pub use memory::InMemoryStore;
/// SQLite-backed store with namespaces.
pub use sqlite::SqliteStore;
