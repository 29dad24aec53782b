use async_trait::async_trait;
use colloquy_agent::{AgentError, CompletionClient};
use colloquy_history::CompletionTurn;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Client replying with queued answers and recording every request.
#[derive(Debug, Clone)]
pub struct ScriptedClient {
    replies: Arc<Mutex<VecDeque<String>>>,
    fallback: String,
    pub requests: Arc<Mutex<Vec<Vec<CompletionTurn>>>>,
}

impl ScriptedClient {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            fallback: fallback.into(),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let client = Self::new("ok");
        client
            .replies
            .lock()
            .extend(replies.into_iter().map(Into::into));
        client
    }

    pub fn last_request(&self) -> Option<Vec<CompletionTurn>> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn submit(&self, turns: &[CompletionTurn]) -> Result<String, AgentError> {
        self.requests.lock().push(turns.to_vec());
        let reply = self.replies.lock().pop_front();
        Ok(reply.unwrap_or_else(|| self.fallback.clone()))
    }
}

#[derive(Debug, Clone)]
pub struct FailingClient {
    message: String,
}

impl FailingClient {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl CompletionClient for FailingClient {
    async fn submit(&self, _turns: &[CompletionTurn]) -> Result<String, AgentError> {
        Err(AgentError::Completion(self.message.clone()))
    }
}
