use colloquy_history::HistoryError;
use thiserror::Error;

/// Errors returned while answering a question.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("history error: {0}")]
    History(#[from] HistoryError),
    #[error("completion failed: {0}")]
    Completion(String),
    #[error("completion returned no text")]
    EmptyResponse,
}
