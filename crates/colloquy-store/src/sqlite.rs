//! SQLite-backed key-value store.

use crate::error::StoreError;
use crate::kv::{KeyValueStore, validate_key};
use log::{debug, info};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::Path;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv (
    namespace TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (namespace, key)
)";

/// Store keeping every key in one table, partitioned by namespace.
///
/// The namespace plays the role of a logical database index: two stores
/// opened on the same file with different namespaces never see each other's
/// keys.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    namespace: String,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open (or create) a database file, creating parent directories.
    pub fn open(path: impl AsRef<Path>, namespace: impl Into<String>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self::with_connection(conn, namespace.into())?;
        info!(
            "opened sqlite store (path={}, namespace={})",
            path.display(),
            store.namespace
        );
        Ok(store)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory(namespace: impl Into<String>) -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?, namespace.into())
    }

    fn with_connection(conn: Connection, namespace: String) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
            namespace,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        validate_key(key)?;
        let conn = self.conn.lock();
        let value = conn
            .query_row(
                "SELECT value FROM kv WHERE namespace = ?1 AND key = ?2",
                params![self.namespace, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO kv (namespace, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(namespace, key) DO UPDATE SET value = excluded.value",
            params![self.namespace, key, value],
        )?;
        debug!(
            "sqlite store set (namespace={}, key={}, value_len={})",
            self.namespace,
            key,
            value.len()
        );
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        let conn = self.conn.lock();
        let removed = conn.execute(
            "DELETE FROM kv WHERE namespace = ?1 AND key = ?2",
            params![self.namespace, key],
        )?;
        debug!(
            "sqlite store delete (namespace={}, key={}, removed={})",
            self.namespace, key, removed
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteStore;
    use crate::KeyValueStore;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn in_memory_round_trip() {
        let store = SqliteStore::open_in_memory("0").expect("store");
        assert_eq!(store.get("conversation:default").expect("get"), None);
        store.set("conversation:default", "[]").expect("set");
        store.set("conversation:default", "[{}]").expect("upsert");
        assert_eq!(
            store.get("conversation:default").expect("get"),
            Some("[{}]".to_string())
        );
        store.delete("conversation:default").expect("delete");
        store.delete("conversation:default").expect("delete missing");
        assert_eq!(store.get("conversation:default").expect("get"), None);
    }

    #[test]
    fn values_persist_across_connections() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("colloquy.db");
        let store = SqliteStore::open(&path, "0").expect("open");
        store.set("k", "persisted").expect("set");
        drop(store);

        let store = SqliteStore::open(&path, "0").expect("reopen");
        assert_eq!(store.get("k").expect("get"), Some("persisted".to_string()));
    }

    #[test]
    fn namespaces_are_isolated() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("colloquy.db");
        let first = SqliteStore::open(&path, "0").expect("first");
        let second = SqliteStore::open(&path, "1").expect("second");

        first.set("k", "zero").expect("set");
        assert_eq!(second.get("k").expect("get"), None);
        second.set("k", "one").expect("set");
        second.delete("k").expect("delete");
        assert_eq!(first.get("k").expect("get"), Some("zero".to_string()));
    }
}
