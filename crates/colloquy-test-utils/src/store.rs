use colloquy_store::{KeyValueStore, StoreError};
use std::io;

/// Store whose every call fails, as if the backend were unreachable.
#[derive(Debug, Clone, Default)]
pub struct UnavailableStore;

impl UnavailableStore {
    pub fn new() -> Self {
        Self
    }

    fn error() -> StoreError {
        StoreError::Io(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "store unavailable",
        ))
    }
}

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(Self::error())
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(Self::error())
    }

    fn delete(&self, _key: &str) -> Result<(), StoreError> {
        Err(Self::error())
    }
}
