//! Completion capability consumed by the assistant.

use crate::error::AgentError;
use async_trait::async_trait;
use colloquy_history::CompletionTurn;

/// Turns an ordered list of role/content pairs into generated text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn submit(&self, turns: &[CompletionTurn]) -> Result<String, AgentError>;
}

/// How a provider-backed client issues its request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompletionStrategy {
    /// Plain chat completion over the context turns.
    #[default]
    Direct,
    /// Chat completion with the provider's web search tool enabled.
    WebSearch,
}

impl CompletionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionStrategy::Direct => "direct",
            CompletionStrategy::WebSearch => "web_search",
        }
    }
}
