//! Centralized configuration loading from config.toml.
//!
//! This crate provides configuration structs and loading logic shared
//! across the search engine and the self-play actor.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`CARO_ZERO_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! CARO_ZERO_<SECTION>_<KEY>=value
//!
//! Examples:
//!     CARO_ZERO_COMMON_ENV_ID=caro9x9
//!     CARO_ZERO_MCTS_C_PUCT=2.0
//!     CARO_ZERO_SELFPLAY_BATCH_SIZE=64
//!     CARO_ZERO_EVALUATION_ROUNDS=40
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{
    apply_env_overrides, load_config, load_from_path, CONFIG_PATH_ENV, CONFIG_SEARCH_PATHS,
};
pub use structs::*;

#[cfg(test)]
mod tests;
