//! Message record model persisted per conversation.

use crate::error::HistoryError;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Speaker role for a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Persona/instructions preamble.
    System,
    /// User-authored message.
    User,
    /// Completion provider reply.
    Assistant,
}

impl Role {
    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = HistoryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "system" => Ok(Role::System),
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(HistoryError::InvalidRole(other.to_string())),
        }
    }
}

/// ISO-8601 creation time, kept as the exact text it was stored with.
///
/// Both offset-qualified (RFC 3339) and offset-less timestamps are accepted;
/// the latter are read as UTC when converted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp {
    raw: String,
    instant: DateTime<Utc>,
}

impl Timestamp {
    /// Current time in RFC 3339 form.
    pub fn now() -> Self {
        Utc::now().into()
    }

    /// Validate `raw` as an ISO-8601 date-time, keeping its text.
    pub fn parse(raw: impl Into<String>) -> Result<Self, HistoryError> {
        let raw = raw.into();
        let instant = match DateTime::parse_from_rfc3339(&raw) {
            Ok(instant) => instant.with_timezone(&Utc),
            Err(_) => raw
                .parse::<NaiveDateTime>()
                .map_err(|err| {
                    HistoryError::MalformedRecord(format!("invalid timestamp {raw:?}: {err}"))
                })?
                .and_utc(),
        };
        Ok(Self { raw, instant })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn to_utc(&self) -> DateTime<Utc> {
        self.instant
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Self {
            raw: instant.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            instant,
        }
    }
}

impl TryFrom<String> for Timestamp {
    type Error = HistoryError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

impl From<Timestamp> for String {
    fn from(timestamp: Timestamp) -> Self {
        timestamp.raw
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// One turn of a conversation.
///
/// Records are immutable once created; fields are only reachable through
/// getters. `id` and `timestamp` are generated when not supplied, both at
/// construction and when decoding stored data that lacks them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageRecord {
    role: Role,
    content: String,
    #[serde(default = "new_record_id", alias = "message_id")]
    id: String,
    #[serde(default = "Timestamp::now")]
    timestamp: Timestamp,
}

impl MessageRecord {
    /// Create a record with a fresh id and the current time.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self::with_identity(role, content, None, None)
    }

    /// Create a record, keeping the given id/timestamp when present.
    pub fn with_identity(
        role: Role,
        content: impl Into<String>,
        id: Option<String>,
        timestamp: Option<Timestamp>,
    ) -> Self {
        Self {
            role,
            content: content.into(),
            id: id.unwrap_or_else(new_record_id),
            timestamp: timestamp.unwrap_or_else(Timestamp::now),
        }
    }

    /// Create a record from an untyped role name, rejecting unknown roles.
    pub fn parse(role: &str, content: impl Into<String>) -> Result<Self, HistoryError> {
        Ok(Self::new(role.parse()?, content))
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }

    pub fn is_system(&self) -> bool {
        self.role == Role::System
    }

    /// Structured form `{role, content, id, timestamp}` as persisted.
    pub fn to_value(&self) -> Value {
        json!({
            "role": self.role.as_str(),
            "content": self.content,
            "id": self.id,
            "timestamp": self.timestamp.as_str(),
        })
    }

    /// Decode the structured form; `role` and `content` are required.
    pub fn from_value(value: Value) -> Result<Self, HistoryError> {
        serde_json::from_value(value).map_err(|err| HistoryError::MalformedRecord(err.to_string()))
    }

    /// The minimal pair handed to the completion provider.
    pub fn to_completion_turn(&self) -> CompletionTurn {
        CompletionTurn {
            role: self.role,
            content: self.content.clone(),
        }
    }
}

fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// Role/content pair sent to the completion provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletionTurn {
    pub role: Role,
    pub content: String,
}

impl CompletionTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}
