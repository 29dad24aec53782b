//! Configuration schema for Colloquy.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Persona used to seed new conversations when none is configured.
pub const DEFAULT_PERSONA: &str = "You are a helpful assistant.";

/// Root config for the Colloquy SDK and CLI.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ColloquyConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub conversation: ConversationConfig,
    #[serde(default)]
    pub agent: AgentConfig,
}

impl ColloquyConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> ColloquyConfigBuilder {
        ColloquyConfigBuilder::default()
    }
}

/// Builder for assembling a `ColloquyConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct ColloquyConfigBuilder {
    config: ColloquyConfig,
}

impl ColloquyConfigBuilder {
    pub fn store(mut self, store: StoreConfig) -> Self {
        self.config.store = store;
        self
    }

    pub fn conversation(mut self, conversation: ConversationConfig) -> Self {
        self.config.conversation = conversation;
        self
    }

    pub fn agent(mut self, agent: AgentConfig) -> Self {
        self.config.agent = agent;
        self
    }

    pub fn build(self) -> ColloquyConfig {
        self.config
    }
}

/// Backend used to persist conversation lists.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Single SQLite database file.
    #[default]
    Sqlite,
    /// One JSON document per key under a directory.
    File,
    /// Process-local map; nothing survives exit.
    Memory,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Sqlite => "sqlite",
            StoreBackend::File => "file",
            StoreBackend::Memory => "memory",
        }
    }
}

/// Key-value store location and namespace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default)]
    pub path: Option<String>,
    /// Logical database inside the backend; conversations in different
    /// namespaces never see each other.
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: None,
            namespace: default_namespace(),
        }
    }
}

impl StoreConfig {
    /// Configured path, or the backend default under `.colloquy/`.
    pub fn resolved_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return PathBuf::from(path);
        }
        let base = PathBuf::from(".colloquy");
        match self.backend {
            StoreBackend::Sqlite => base.join("colloquy.db"),
            StoreBackend::File | StoreBackend::Memory => base.join("conversations"),
        }
    }
}

fn default_namespace() -> String {
    "0".to_string()
}

/// Conversation defaults: id, context window and persona.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationConfig {
    #[serde(default = "default_conversation_id")]
    pub default_id: String,
    /// Maximum number of turns sent to the completion provider, system
    /// records included.
    #[serde(default = "default_context_limit")]
    pub context_limit: usize,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// System preamble written as the first record of every conversation.
    #[serde(default = "default_persona")]
    pub persona: String,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            default_id: default_conversation_id(),
            context_limit: default_context_limit(),
            key_prefix: default_key_prefix(),
            persona: default_persona(),
        }
    }
}

fn default_conversation_id() -> String {
    "default".to_string()
}

fn default_context_limit() -> usize {
    10
}

fn default_key_prefix() -> String {
    "conversation:".to_string()
}

fn default_persona() -> String {
    DEFAULT_PERSONA.to_string()
}

/// How the completion provider is called.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStrategyConfig {
    /// Plain chat completion over the bounded context.
    #[default]
    Direct,
    /// Provider-side web search over the rendered transcript.
    WebSearch,
}

/// Completion provider settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub strategy: CompletionStrategyConfig,
    /// Environment variable holding the provider API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            strategy: CompletionStrategyConfig::default(),
            api_key_env: default_api_key_env(),
        }
    }
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}
