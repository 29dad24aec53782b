//! Per-conversation handle.

use crate::error::HistoryError;
use crate::record::{CompletionTurn, MessageRecord};
use crate::store::ConversationStore;

/// A conversation id bound to a store and a context limit.
///
/// Handles are opened through [`ConversationStore::conversation`], which
/// seeds the persona record before the handle is returned.
#[derive(Debug, Clone)]
pub struct Conversation {
    store: ConversationStore,
    id: String,
    context_limit: usize,
}

impl Conversation {
    pub(crate) fn new(store: ConversationStore, id: String, context_limit: usize) -> Self {
        Self {
            store,
            id,
            context_limit,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn context_limit(&self) -> usize {
        self.context_limit
    }

    pub fn add_message(&self, record: MessageRecord) -> Result<MessageRecord, HistoryError> {
        self.store.append(&self.id, record)
    }

    /// Bounded projection sized by this handle's context limit.
    pub fn context_messages(&self) -> Result<Vec<CompletionTurn>, HistoryError> {
        self.store.bounded_context(&self.id, self.context_limit)
    }

    pub fn all_messages(&self) -> Result<Vec<MessageRecord>, HistoryError> {
        self.store.all(&self.id)
    }

    pub fn reset(&self) -> Result<String, HistoryError> {
        self.store.reset(&self.id)
    }
}
