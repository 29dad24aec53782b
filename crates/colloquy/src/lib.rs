//! Public SDK surface for Colloquy.
//!
//! This crate re-exports the building blocks and wires them together from a
//! [`ColloquyConfig`](colloquy_config::ColloquyConfig).

pub mod error;
pub mod setup;

/// Re-export for convenience.
pub use colloquy_agent as agent;
/// Re-export for convenience.
pub use colloquy_config as config;
/// Re-export for convenience.
pub use colloquy_history as history;
/// Re-export for convenience.
pub use colloquy_store as store;

pub use error::SetupError;
pub use setup::{
    build_assistant, build_completion_client, build_llm, completion_strategy, history_settings,
    open_history, open_store,
};

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::builder()
            .format_timestamp_millis()
            .parse_default_env()
            .try_init();
    }
}
