//! Completion client backed by an `autoagents` LLM provider.

use crate::client::{CompletionClient, CompletionStrategy};
use crate::error::AgentError;
use async_trait::async_trait;
use autoagents_llm::LLMProvider;
use autoagents_llm::chat::{ChatMessage, ChatResponse, ChatRole, MessageType};
use autoagents_llm::error::LLMError;
use colloquy_history::{CompletionTurn, Role};
use log::{debug, warn};
use std::sync::Arc;

/// Sends context turns to an [`LLMProvider`] using the configured strategy.
#[derive(Clone)]
pub struct LlmCompletionClient {
    llm: Arc<dyn LLMProvider>,
    strategy: CompletionStrategy,
}

impl LlmCompletionClient {
    pub fn new(llm: Arc<dyn LLMProvider>, strategy: CompletionStrategy) -> Self {
        Self { llm, strategy }
    }

    pub fn strategy(&self) -> CompletionStrategy {
        self.strategy
    }
}

#[async_trait]
impl CompletionClient for LlmCompletionClient {
    async fn submit(&self, turns: &[CompletionTurn]) -> Result<String, AgentError> {
        debug!(
            "submitting completion (strategy={}, turns={})",
            self.strategy.as_str(),
            turns.len()
        );
        let response = match self.strategy {
            CompletionStrategy::Direct => {
                let messages: Vec<ChatMessage> = turns.iter().map(to_chat_message).collect();
                self.llm.chat_with_tools(&messages, None, None).await
            }
            CompletionStrategy::WebSearch => {
                self.llm.chat_with_web_search(render_transcript(turns)).await
            }
        }
        .map_err(completion_error)?;
        response_text(response.as_ref())
    }
}

fn to_chat_message(turn: &CompletionTurn) -> ChatMessage {
    ChatMessage {
        role: chat_role(turn.role),
        message_type: MessageType::Text,
        content: turn.content.clone(),
    }
}

fn chat_role(role: Role) -> ChatRole {
    match role {
        Role::System => ChatRole::System,
        Role::User => ChatRole::User,
        Role::Assistant => ChatRole::Assistant,
    }
}

/// Web search takes a single input, so the context is flattened to
/// `role: content` lines.
fn render_transcript(turns: &[CompletionTurn]) -> String {
    turns
        .iter()
        .map(|turn| format!("{}: {}", turn.role, turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

fn response_text(response: &dyn ChatResponse) -> Result<String, AgentError> {
    match response.text() {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => {
            warn!("completion returned no text");
            Err(AgentError::EmptyResponse)
        }
    }
}

fn completion_error(err: LLMError) -> AgentError {
    warn!("completion failed (error={})", err);
    AgentError::Completion(err.to_string())
}
