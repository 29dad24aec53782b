//! Conversation persistence over a key-value store.

use crate::conversation::Conversation;
use crate::error::HistoryError;
use crate::record::{CompletionTurn, MessageRecord};
use crate::window;
use colloquy_store::{KeyValueStore, StoreError};
use log::{debug, info};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Conversation id used when a caller does not name one.
pub const DEFAULT_CONVERSATION_ID: &str = "default";
/// Number of turns handed to the completion provider by default.
pub const DEFAULT_CONTEXT_LIMIT: usize = 10;
/// Prefix for every conversation key in the store.
pub const DEFAULT_KEY_PREFIX: &str = "conversation:";
/// Message returned after a conversation is reset.
pub const RESET_CONFIRMATION: &str = "Conversation has been reset.";

const DEFAULT_PERSONA: &str = "You are a helpful assistant.";

/// Settings shared by every conversation of a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistorySettings {
    /// Content of the system record seeded into new conversations.
    pub persona: String,
    /// Prefix joined with the conversation id to form the storage key.
    pub key_prefix: String,
    /// Context limit for handles opened without an explicit one.
    pub context_limit: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            persona: DEFAULT_PERSONA.to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            context_limit: DEFAULT_CONTEXT_LIMIT,
        }
    }
}

impl HistorySettings {
    pub fn new(persona: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
            ..Self::default()
        }
    }

    pub fn with_key_prefix(mut self, key_prefix: impl Into<String>) -> Self {
        self.key_prefix = key_prefix.into();
        self
    }

    pub fn with_context_limit(mut self, context_limit: usize) -> Self {
        self.context_limit = context_limit;
        self
    }
}

/// Owns the read-modify-write cycle for every conversation in a store.
///
/// Each mutating operation loads the full record list, changes a local copy
/// and writes the list back while holding a lock dedicated to that
/// conversation id. Locks are process-local; separate processes sharing a
/// backend are not coordinated. A lock is dropped from the table as soon as
/// no operation holds or waits on it, so the table only tracks conversations
/// with writes in flight.
#[derive(Clone)]
pub struct ConversationStore {
    store: Arc<dyn KeyValueStore>,
    settings: HistorySettings,
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl std::fmt::Debug for ConversationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationStore")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl ConversationStore {
    pub fn new(store: Arc<dyn KeyValueStore>, settings: HistorySettings) -> Self {
        Self {
            store,
            settings,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn settings(&self) -> &HistorySettings {
        &self.settings
    }

    /// Seed the persona record if the conversation has no records yet.
    pub fn initialize(&self, conversation_id: &str) -> Result<Vec<MessageRecord>, HistoryError> {
        self.with_lock(conversation_id, || {
            let mut records = self.load(conversation_id)?;
            if records.is_empty() {
                records.push(self.persona_record());
                self.write(conversation_id, &records)?;
                info!("initialized conversation (id={})", conversation_id);
            }
            Ok(records)
        })
    }

    /// Append `record` at the tail of the conversation and return it.
    ///
    /// An empty conversation receiving a non-system record is seeded with
    /// the persona first. A second system record is rejected.
    pub fn append(
        &self,
        conversation_id: &str,
        record: MessageRecord,
    ) -> Result<MessageRecord, HistoryError> {
        self.with_lock(conversation_id, || {
            let mut records = self.load(conversation_id)?;
            if record.is_system() {
                if records.iter().any(MessageRecord::is_system) {
                    return Err(HistoryError::DuplicateSystemRecord(
                        conversation_id.to_string(),
                    ));
                }
            } else if records.is_empty() {
                records.push(self.persona_record());
            }
            records.push(record.clone());
            self.write(conversation_id, &records)?;
            debug!(
                "appended message (conversation={}, role={}, id={}, count={})",
                conversation_id,
                record.role(),
                record.id(),
                records.len()
            );
            Ok(record)
        })
    }

    /// Project the stored records into at most `limit` completion turns.
    ///
    /// Never seeds: an unknown conversation yields an empty projection.
    pub fn bounded_context(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> Result<Vec<CompletionTurn>, HistoryError> {
        let records = self.load(conversation_id)?;
        Ok(window::bounded_context(&records, limit))
    }

    /// Every stored record in insertion order.
    pub fn all(&self, conversation_id: &str) -> Result<Vec<MessageRecord>, HistoryError> {
        self.load(conversation_id)
    }

    /// Delete the conversation and seed it again with the persona.
    pub fn reset(&self, conversation_id: &str) -> Result<String, HistoryError> {
        self.with_lock(conversation_id, || {
            self.store.delete(&self.key_for(conversation_id))?;
            self.write(conversation_id, &[self.persona_record()])?;
            info!("reset conversation (id={})", conversation_id);
            Ok(RESET_CONFIRMATION.to_string())
        })
    }

    /// Open a handle on `conversation_id`, seeding it if needed.
    pub fn conversation(
        &self,
        conversation_id: impl Into<String>,
        context_limit: usize,
    ) -> Result<Conversation, HistoryError> {
        let conversation_id = conversation_id.into();
        self.initialize(&conversation_id)?;
        Ok(Conversation::new(
            self.clone(),
            conversation_id,
            context_limit,
        ))
    }

    /// Open a handle using the configured context limit.
    pub fn open(&self, conversation_id: impl Into<String>) -> Result<Conversation, HistoryError> {
        self.conversation(conversation_id, self.settings.context_limit)
    }

    /// Storage key for a conversation id.
    pub fn key_for(&self, conversation_id: &str) -> String {
        format!("{}{}", self.settings.key_prefix, conversation_id)
    }

    fn persona_record(&self) -> MessageRecord {
        MessageRecord::system(self.settings.persona.clone())
    }

    /// Run `op` under the conversation's lock, then drop the lock from the
    /// table if nobody else holds a handle to it.
    fn with_lock<T>(
        &self,
        conversation_id: &str,
        op: impl FnOnce() -> Result<T, HistoryError>,
    ) -> Result<T, HistoryError> {
        let lock = self.lock_for(conversation_id);
        let result = {
            let _guard = lock.lock();
            op()
        };
        self.release(conversation_id, &lock);
        result
    }

    fn lock_for(&self, conversation_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        locks
            .entry(conversation_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    // Handles are only cloned under the table lock, so a count of two (the
    // table plus `lock`) means no other operation holds or waits on it.
    fn release(&self, conversation_id: &str, lock: &Arc<Mutex<()>>) {
        let mut locks = self.locks.lock();
        if Arc::strong_count(lock) == 2 {
            locks.remove(conversation_id);
        }
    }

    fn load(&self, conversation_id: &str) -> Result<Vec<MessageRecord>, HistoryError> {
        let Some(raw) = self.store.get(&self.key_for(conversation_id))? else {
            return Ok(Vec::new());
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        let values: Vec<Value> = serde_json::from_str(&raw)
            .map_err(|err| HistoryError::MalformedRecord(err.to_string()))?;
        values.into_iter().map(MessageRecord::from_value).collect()
    }

    fn write(&self, conversation_id: &str, records: &[MessageRecord]) -> Result<(), HistoryError> {
        let values: Vec<Value> = records.iter().map(MessageRecord::to_value).collect();
        let payload = serde_json::to_string(&values).map_err(StoreError::from)?;
        self.store.set(&self.key_for(conversation_id), &payload)?;
        Ok(())
    }
}
