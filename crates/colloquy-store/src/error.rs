//! Error types for key-value store backends.

/// Errors returned by key-value store backends.
///
/// A missing key is never an error; backends return `Ok(None)` instead.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem error from the file backend or while creating directories.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// SQLite connection or statement failure.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A file-backed entry could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Empty keys are rejected by every backend.
    #[error("invalid key: {0:?}")]
    InvalidKey(String),
}
