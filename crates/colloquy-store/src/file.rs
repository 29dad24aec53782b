//! File-backed key-value store: one JSON document per key.

use crate::error::StoreError;
use crate::kv::{KeyValueStore, validate_key};
use log::{debug, info};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// On-disk entry; the raw key is kept since file names are encoded.
#[derive(Debug, Serialize, Deserialize)]
struct FileEntry {
    key: String,
    value: String,
}

/// Store writing each key to `<root>/<encoded key>.json`.
///
/// Writes go to a uniquely named temporary file in the same directory and are
/// renamed into place, so a reader never observes a partially written value
/// and stores sharing a root never write through each other's temp files.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        info!("initialized file store (root={})", root.display());
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", encode_key(key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        validate_key(key)?;
        let contents = match fs::read_to_string(self.entry_path(key)) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let entry: FileEntry = serde_json::from_str(&contents)?;
        Ok(Some(entry.value))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        let _guard = self.write_lock.lock();
        let mut file = NamedTempFile::new_in(&self.root)?;
        let entry = FileEntry {
            key: key.to_string(),
            value: value.to_string(),
        };
        serde_json::to_writer(&mut file, &entry)?;
        file.flush()?;
        file.persist(self.entry_path(key)).map_err(|err| StoreError::Io(err.error))?;
        debug!("file store set (key={}, value_len={})", key, value.len());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        let _guard = self.write_lock.lock();
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => {
                debug!("file store delete (key={})", key);
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Percent-encode every byte outside `[A-Za-z0-9._-]` so any key maps to a
/// single, collision-free file name.
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'-') {
            encoded.push(byte as char);
        } else {
            let _ = write!(encoded, "%{byte:02X}");
        }
    }
    encoded
}
