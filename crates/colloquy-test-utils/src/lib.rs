//! Test helpers shared across Colloquy crates.

pub mod client;
pub mod llm;
pub mod store;

pub use client::{FailingClient, ScriptedClient};
pub use llm::{FailingLLM, FixedChatResponse, FixedLLM, RecordingChatLLM};
pub use store::UnavailableStore;
