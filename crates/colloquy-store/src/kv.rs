//! Key-value store abstraction.

use crate::error::StoreError;

/// Minimal persistent string store used by the history layer.
///
/// Values are opaque to the store. Only single-key operations are offered;
/// callers that need read-modify-write atomicity must serialize per key.
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value for `key`, `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Insert or replace the value for `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Deleting an absent key succeeds.
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

pub(crate) fn validate_key(key: &str) -> Result<(), StoreError> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}
