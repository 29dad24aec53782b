//! Conversation-aware question answering.

use crate::client::CompletionClient;
use crate::error::AgentError;
use colloquy_history::{Conversation, MessageRecord};
use log::{debug, info};
use std::sync::Arc;

/// Answers questions within one conversation.
///
/// The question is stored before the completion call, so a failed call
/// leaves it in the history without a reply.
#[derive(Clone)]
pub struct Assistant {
    conversation: Conversation,
    client: Arc<dyn CompletionClient>,
}

impl Assistant {
    pub fn new(conversation: Conversation, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            conversation,
            client,
        }
    }

    /// Store the question, ask the client with the bounded context and store the reply.
    pub async fn ask(&self, question: &str) -> Result<String, AgentError> {
        self.conversation
            .add_message(MessageRecord::user(question))?;
        let turns = self.conversation.context_messages()?;
        debug!(
            "asking assistant (conversation={}, context_turns={})",
            self.conversation.id(),
            turns.len()
        );
        let reply = self.client.submit(&turns).await?;
        self.conversation
            .add_message(MessageRecord::assistant(reply.clone()))?;
        info!(
            "assistant replied (conversation={}, reply_len={})",
            self.conversation.id(),
            reply.len()
        );
        Ok(reply)
    }

    pub fn history(&self) -> Result<Vec<MessageRecord>, AgentError> {
        Ok(self.conversation.all_messages()?)
    }

    pub fn reset(&self) -> Result<String, AgentError> {
        Ok(self.conversation.reset()?)
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }
}
