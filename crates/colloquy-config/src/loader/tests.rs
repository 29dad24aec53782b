//! Tests for layered configuration loading.

use super::*;
use crate::{CompletionStrategyConfig, StoreBackend, StoreConfig};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write JSON5 contents to a path, creating parent directories if needed.
fn write_json5(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(path, contents).expect("write");
}

#[test]
fn parse_minimal_config() {
    let config = ColloquyConfig::load_from_str("{}").expect("config");
    assert_eq!(config, ColloquyConfig::default());
    assert_eq!(config.conversation.default_id, "default");
    assert_eq!(config.conversation.context_limit, 10);
    assert_eq!(config.conversation.key_prefix, "conversation:");
    assert_eq!(config.store.backend, StoreBackend::Sqlite);
}

#[test]
fn parse_full_config() {
    let json5 = r#"{
        // comments are allowed
        store: { backend: "file", path: "/var/lib/colloquy", namespace: "2" },
        conversation: { default_id: "match-day", context_limit: 3, persona: "You coach football." },
        agent: { model: "gpt-4.1", strategy: "web_search" },
    }"#;
    let config = ColloquyConfig::load_from_str(json5).expect("config");
    assert_eq!(config.store.backend, StoreBackend::File);
    assert_eq!(config.store.resolved_path(), PathBuf::from("/var/lib/colloquy"));
    assert_eq!(config.store.namespace, "2");
    assert_eq!(config.conversation.default_id, "match-day");
    assert_eq!(config.conversation.context_limit, 3);
    assert_eq!(config.conversation.persona, "You coach football.");
    assert_eq!(config.agent.model, "gpt-4.1");
    assert_eq!(config.agent.strategy, CompletionStrategyConfig::WebSearch);
    assert_eq!(config.agent.api_key_env, "OPENAI_API_KEY");
}

#[test]
fn rejects_unknown_top_level_key() {
    let err = ColloquyConfig::load_from_str(r#"{ unexpected: true }"#).unwrap_err();
    assert!(format!("{err}").contains("unknown key"));
}

#[test]
fn rejects_unknown_backend() {
    let err = ColloquyConfig::load_from_str(r#"{ store: { backend: "redis" } }"#).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("store.backend"), "{msg}");
}

#[test]
fn rejects_zero_context_limit() {
    let err =
        ColloquyConfig::load_from_str(r#"{ conversation: { context_limit: 0 } }"#).unwrap_err();
    assert!(format!("{err}").contains("conversation.context_limit"));
}

#[test]
fn rejects_blank_persona() {
    let err = ColloquyConfig::load_from_str(r#"{ conversation: { persona: "  " } }"#).unwrap_err();
    assert!(format!("{err}").contains("conversation.persona"));
}

#[test]
fn default_paths_follow_backend() {
    let sqlite = StoreConfig::default();
    assert_eq!(sqlite.resolved_path(), PathBuf::from(".colloquy/colloquy.db"));
    let file = StoreConfig {
        backend: StoreBackend::File,
        ..StoreConfig::default()
    };
    assert_eq!(file.resolved_path(), PathBuf::from(".colloquy/conversations"));
}

#[test]
fn load_from_missing_path_names_the_file() {
    let temp = TempDir::new().expect("tmp");
    let missing = temp.path().join("absent.json5");
    let err = ColloquyConfig::load_from_path(&missing).unwrap_err();
    assert!(format!("{err}").contains("absent.json5"));
}

#[test]
fn layered_config_applies_precedence() {
    let temp = TempDir::new().expect("tmp");
    let root = temp.path();
    let project_root = root.join("project");
    fs::create_dir_all(project_root.join(".git")).expect("git");
    let cwd = project_root.join("subdir");
    fs::create_dir_all(&cwd).expect("cwd");

    let user_config = root.join("home").join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILE);
    write_json5(
        &user_config,
        r#"{ conversation: { persona: "user persona", context_limit: 4 }, store: { namespace: "user" } }"#,
    );
    write_json5(
        &project_root.join(DEFAULT_CONFIG_FILE),
        r#"{ conversation: { context_limit: 6 }, store: { backend: "file" } }"#,
    );
    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        r#"{ conversation: { context_limit: 8 } }"#,
    );
    let runtime = root.join("runtime.json5");
    write_json5(&runtime, r#"{ store: { namespace: "runtime" } }"#);

    let options = LayeredConfigOptions::new(&cwd)
        .with_user_config_path(Some(user_config))
        .with_runtime_path(&runtime);
    let layered = ColloquyConfig::load_layered_with_options(options).expect("layered");

    assert_eq!(layered.config.conversation.persona, "user persona");
    assert_eq!(layered.config.conversation.context_limit, 8);
    assert_eq!(layered.config.store.backend, StoreBackend::File);
    assert_eq!(layered.config.store.namespace, "runtime");
    let sources = layered
        .layers
        .iter()
        .map(|layer| layer.source)
        .collect::<Vec<_>>();
    assert_eq!(
        sources,
        vec![
            ConfigLayerSource::User,
            ConfigLayerSource::Project,
            ConfigLayerSource::Cwd,
            ConfigLayerSource::Runtime,
        ]
    );
}

#[test]
fn layered_config_loads_project_file_once_when_cwd_is_root() {
    let temp = TempDir::new().expect("tmp");
    let project_root = temp.path().join("project");
    fs::create_dir_all(project_root.join(".git")).expect("git");
    write_json5(
        &project_root.join(DEFAULT_CONFIG_FILE),
        r#"{ conversation: { default_id: "root" } }"#,
    );

    let options = LayeredConfigOptions::new(&project_root).with_user_config_path(None);
    let layered = ColloquyConfig::load_layered_with_options(options).expect("layered");
    assert_eq!(layered.layers.len(), 1);
    assert_eq!(layered.layers[0].source, ConfigLayerSource::Project);
    assert_eq!(layered.config.conversation.default_id, "root");
}

#[test]
fn layered_config_rejects_invalid_layer() {
    let temp = TempDir::new().expect("tmp");
    let cwd = temp.path().join("work");
    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        r#"{ agent: { strategy: "telepathy" } }"#,
    );
    let options = LayeredConfigOptions::new(&cwd).with_user_config_path(None);
    let err = ColloquyConfig::load_layered_with_options(options).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("cwd("), "{msg}");
    assert!(msg.contains("agent.strategy"), "{msg}");
}
