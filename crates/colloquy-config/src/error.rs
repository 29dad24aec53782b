//! Error types for config loading and validation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned while loading or validating config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file exists but could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Resolving a directory during layer discovery failed.
    #[error("failed to resolve config location: {0}")]
    Io(#[from] std::io::Error),
    /// A config layer is not valid JSON5.
    #[error("failed to parse config: {0}")]
    Parse(#[from] json5::Error),
    /// The merged JSON does not decode into the config model.
    #[error("failed to decode config: {0}")]
    Decode(#[from] serde_json::Error),
    /// A field has the wrong shape or an out-of-range value.
    #[error("invalid config at {path}: {message}")]
    InvalidField { path: String, message: String },
}
