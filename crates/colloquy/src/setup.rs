//! Config mapping for stores, history and completion clients.

use crate::error::SetupError;
use autoagents_llm::LLMProvider;
use autoagents_llm::backends::openai::OpenAI;
use autoagents_llm::builder::LLMBuilder;
use colloquy_agent::{Assistant, CompletionClient, CompletionStrategy, LlmCompletionClient};
use colloquy_config::{
    AgentConfig, ColloquyConfig, CompletionStrategyConfig, ConversationConfig, StoreBackend,
    StoreConfig,
};
use colloquy_history::{ConversationStore, HistorySettings};
use colloquy_store::{FileStore, InMemoryStore, KeyValueStore, SqliteStore};
use log::info;
use std::sync::Arc;

/// Open the key-value backend named by the store config.
///
/// The file backend keeps each namespace in its own subdirectory.
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn KeyValueStore>, SetupError> {
    let path = config.resolved_path();
    info!(
        "opening store (backend={}, path={}, namespace={})",
        config.backend.as_str(),
        path.display(),
        config.namespace
    );
    let store: Arc<dyn KeyValueStore> = match config.backend {
        StoreBackend::Sqlite => Arc::new(SqliteStore::open(&path, config.namespace.clone())?),
        StoreBackend::File => Arc::new(FileStore::new(path.join(&config.namespace))?),
        StoreBackend::Memory => Arc::new(InMemoryStore::new()),
    };
    Ok(store)
}

/// Translate conversation config into history settings.
pub fn history_settings(config: &ConversationConfig) -> HistorySettings {
    HistorySettings::new(config.persona.clone())
        .with_key_prefix(config.key_prefix.clone())
        .with_context_limit(config.context_limit)
}

/// Open the store and wrap it in a conversation store.
pub fn open_history(config: &ColloquyConfig) -> Result<ConversationStore, SetupError> {
    let store = open_store(&config.store)?;
    Ok(ConversationStore::new(
        store,
        history_settings(&config.conversation),
    ))
}

/// Map the configured strategy to the runtime enum.
pub fn completion_strategy(strategy: CompletionStrategyConfig) -> CompletionStrategy {
    match strategy {
        CompletionStrategyConfig::Direct => CompletionStrategy::Direct,
        CompletionStrategyConfig::WebSearch => CompletionStrategy::WebSearch,
    }
}

/// Build the LLM provider, reading its API key from the configured variable.
pub fn build_llm(config: &AgentConfig) -> Result<Arc<dyn LLMProvider>, SetupError> {
    if config.provider != "openai" {
        return Err(SetupError::UnsupportedProvider(config.provider.clone()));
    }
    let api_key = std::env::var(&config.api_key_env)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| SetupError::MissingApiKey(config.api_key_env.clone()))?;
    info!(
        "building LLM provider (provider={}, model={})",
        config.provider, config.model
    );
    let llm: Arc<dyn LLMProvider> = LLMBuilder::<OpenAI>::new()
        .api_key(api_key)
        .model(config.model.clone())
        .build()
        .map_err(|err| SetupError::Provider(err.to_string()))?;
    Ok(llm)
}

/// Wrap a provider in a completion client using the configured strategy.
pub fn build_completion_client(
    config: &AgentConfig,
    llm: Arc<dyn LLMProvider>,
) -> Arc<dyn CompletionClient> {
    Arc::new(LlmCompletionClient::new(
        llm,
        completion_strategy(config.strategy),
    ))
}

/// Open `conversation_id` with the configured context limit.
pub fn build_assistant(
    history: &ConversationStore,
    conversation_id: &str,
    client: Arc<dyn CompletionClient>,
) -> Result<Assistant, SetupError> {
    let conversation = history.open(conversation_id)?;
    Ok(Assistant::new(conversation, client))
}

#[cfg(test)]
mod tests {
    use super::{completion_strategy, history_settings};
    use colloquy_agent::CompletionStrategy;
    use colloquy_config::{CompletionStrategyConfig, ConversationConfig};
    use pretty_assertions::assert_eq;

    #[test]
    fn maps_strategies() {
        assert_eq!(
            completion_strategy(CompletionStrategyConfig::Direct),
            CompletionStrategy::Direct
        );
        assert_eq!(
            completion_strategy(CompletionStrategyConfig::WebSearch),
            CompletionStrategy::WebSearch
        );
    }

    #[test]
    fn maps_conversation_settings() {
        let config = ConversationConfig {
            context_limit: 4,
            key_prefix: "chat:".to_string(),
            persona: "You are a football expert.".to_string(),
            ..ConversationConfig::default()
        };
        let settings = history_settings(&config);
        assert_eq!(settings.context_limit, 4);
        assert_eq!(settings.key_prefix, "chat:");
        assert_eq!(settings.persona, "You are a football expert.");
    }
}
