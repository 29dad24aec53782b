//! Error types for conversation history.

use colloquy_store::StoreError;
use thiserror::Error;

/// Errors returned by conversation history operations.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// The backing key-value store failed, or the payload could not be
    /// encoded for it; surfaced unchanged, never retried.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
    /// A stored payload does not parse into the record shape.
    #[error("malformed record: {0}")]
    MalformedRecord(String),
    /// A role outside system/user/assistant.
    #[error("invalid role: {0:?}")]
    InvalidRole(String),
    /// The conversation already has its system preamble.
    #[error("conversation {0:?} already has a system record")]
    DuplicateSystemRecord(String),
}
