use colloquy_history::HistoryError;
use colloquy_store::StoreError;
use thiserror::Error;

/// Errors raised while assembling components from configuration.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("history error: {0}")]
    History(#[from] HistoryError),
    #[error("environment variable {0} is not set")]
    MissingApiKey(String),
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),
    #[error("failed to build LLM provider: {0}")]
    Provider(String),
}
