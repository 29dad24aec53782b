//! Question answering over a stored conversation.
//!
//! An [`Assistant`] appends the user's question to its conversation, sends
//! the bounded context to a [`CompletionClient`] and stores the reply.

pub mod assistant;
pub mod client;
pub mod error;
pub mod llm;

pub use assistant::Assistant;
pub use client::{CompletionClient, CompletionStrategy};
pub use error::AgentError;
pub use llm::LlmCompletionClient;
