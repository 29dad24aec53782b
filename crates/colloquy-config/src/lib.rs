//! Configuration for Colloquy.
//!
//! Holds the JSON5 schema for store, conversation and agent settings together
//! with the layered loader (user, project, cwd and runtime overrides).

mod error;
mod loader;
mod model;

pub use error::ConfigError;
pub use loader::{ConfigLayer, ConfigLayerSource, LayeredConfig, LayeredConfigOptions};
pub use model::*;
