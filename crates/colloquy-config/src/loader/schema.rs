//! Schema validation for Colloquy JSON5 configuration layers.
//!
//! Layers are partial, so only the keys that are present are checked; serde
//! fills in the rest from defaults once all layers are merged.

use crate::ConfigError;
use serde_json::{Map, Value};

/// Validate a single config layer against the schema.
pub(super) fn validate_layer_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    ensure_allowed_keys(map, &["$schema", "store", "conversation", "agent"], layer, "")?;

    if let Some(value) = map.get("$schema") {
        expect_string(value, layer, "$schema")?;
    }
    if let Some(value) = map.get("store") {
        validate_store(value, layer, "store")?;
    }
    if let Some(value) = map.get("conversation") {
        validate_conversation(value, layer, "conversation")?;
    }
    if let Some(value) = map.get("agent") {
        validate_agent(value, layer, "agent")?;
    }
    Ok(())
}

/// Validate the "store" block.
fn validate_store(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["backend", "path", "namespace"], layer, path)?;

    if let Some(value) = map.get("backend") {
        expect_one_of(
            value,
            &["sqlite", "file", "memory"],
            layer,
            &join_path(path, "backend"),
        )?;
    }
    if let Some(value) = map.get("path") {
        expect_string(value, layer, &join_path(path, "path"))?;
    }
    if let Some(value) = map.get("namespace") {
        expect_string(value, layer, &join_path(path, "namespace"))?;
    }
    Ok(())
}

/// Validate the "conversation" block.
fn validate_conversation(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(
        map,
        &["default_id", "context_limit", "key_prefix", "persona"],
        layer,
        path,
    )?;

    if let Some(value) = map.get("default_id") {
        expect_string(value, layer, &join_path(path, "default_id"))?;
    }
    if let Some(value) = map.get("context_limit") {
        expect_u64(value, layer, &join_path(path, "context_limit"))?;
    }
    if let Some(value) = map.get("key_prefix") {
        expect_string(value, layer, &join_path(path, "key_prefix"))?;
    }
    if let Some(value) = map.get("persona") {
        expect_string(value, layer, &join_path(path, "persona"))?;
    }
    Ok(())
}

/// Validate the "agent" block.
fn validate_agent(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(
        map,
        &["provider", "model", "strategy", "api_key_env"],
        layer,
        path,
    )?;

    if let Some(value) = map.get("provider") {
        expect_one_of(value, &["openai"], layer, &join_path(path, "provider"))?;
    }
    if let Some(value) = map.get("model") {
        expect_string(value, layer, &join_path(path, "model"))?;
    }
    if let Some(value) = map.get("strategy") {
        expect_one_of(
            value,
            &["direct", "web_search"],
            layer,
            &join_path(path, "strategy"),
        )?;
    }
    if let Some(value) = map.get("api_key_env") {
        expect_string(value, layer, &join_path(path, "api_key_env"))?;
    }
    Ok(())
}

fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(layer, path, "expected object")),
    }
}

fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.as_str().is_some() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string"))
    }
}

fn expect_u64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_u64() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected non-negative integer"))
    }
}

/// Expect a string drawn from a fixed set of variants.
fn expect_one_of(
    value: &Value,
    variants: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    let Some(found) = value.as_str() else {
        return Err(invalid_field(layer, path, "expected string"));
    };
    if variants.contains(&found) {
        Ok(())
    } else {
        Err(invalid_field(
            layer,
            path,
            &format!("expected one of {}", variants.join(", ")),
        ))
    }
}

/// Ensure an object contains only allowed keys.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    match map.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(invalid_field(layer, &join_path(path, key), "unknown key")),
        None => Ok(()),
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let normalized_path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{normalized_path}"),
        message: message.to_string(),
    }
}
