//! Conversation history for Colloquy.
//!
//! Each conversation is an append-only list of [`MessageRecord`]s stored as a
//! single JSON document in a [`colloquy_store::KeyValueStore`]. The
//! [`ConversationStore`] owns the read-modify-write cycle over that document
//! and projects it into a bounded context for the completion provider.

pub mod conversation;
pub mod error;
pub mod record;
pub mod store;
pub mod window;

pub use conversation::Conversation;
pub use error::HistoryError;
pub use record::{CompletionTurn, MessageRecord, Role, Timestamp};
pub use store::{
    ConversationStore, DEFAULT_CONTEXT_LIMIT, DEFAULT_CONVERSATION_ID, DEFAULT_KEY_PREFIX,
    HistorySettings, RESET_CONFIRMATION,
};
pub use window::bounded_context;
