//! Core traits and types for the caro-zero engine
//!
//! This crate provides the abstractions shared by games, the search engine
//! and the self-play actor:
//! - `Game`: position-level game interface keyed by canonical `StateKey`s
//! - `StateKey` / `Player`: fixed-width state identifiers and seats
//! - `EncodedBatch`: dense oracle input
//! - `Registry`: static registration of game variants by env_id

pub mod game;
pub mod registry;
pub mod state;

// Re-export main types for convenience
pub use game::{EncodedBatch, Game, GameError};
pub use registry::{
    clear_registry, create_game, is_registered, list_registered_games, register_game, GameFactory,
};
pub use state::{Player, StateKey};

/// Test utilities (internal use only)
#[cfg(test)]
pub(crate) mod test_utils {
    use once_cell::sync::Lazy;
    use std::sync::Mutex;

    /// Global mutex to serialize all registry-dependent tests
    pub static REGISTRY_TEST_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
}
