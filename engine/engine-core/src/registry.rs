//! Static game registry.
//!
//! Game variants register a factory under their env_id once at startup; the
//! actor and tests look them up by name at runtime. The search engine never
//! touches the registry, it only sees `&dyn Game`.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tracing::warn;

use crate::game::Game;

/// Factory function type for creating game instances
pub type GameFactory = fn() -> Box<dyn Game>;

/// Thread-safe registry mapping env_id to game factory functions
static REGISTRY: Lazy<Mutex<HashMap<String, GameFactory>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Factories are plain fn pointers, so a panic while holding the lock cannot
/// leave the map half-written. Recover the guard instead of propagating poison.
fn registry() -> MutexGuard<'static, HashMap<String, GameFactory>> {
    REGISTRY.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Register a game variant under `env_id`.
///
/// Re-registering an existing id replaces its factory and logs a warning.
///
/// # Example
///
/// ```rust
/// # use engine_core::{register_game, Game, GameError, EncodedBatch, Player, StateKey};
/// # #[derive(Debug)]
/// # struct Nim;
/// # impl Game for Nim {
/// #     fn env_id(&self) -> &str { "nim" }
/// #     fn initial_state(&self) -> StateKey { StateKey::from(vec![3]) }
/// #     fn action_space(&self) -> usize { 1 }
/// #     fn obs_shape(&self) -> Vec<usize> { vec![1] }
/// #     fn legal_moves(&self, s: &StateKey) -> Vec<usize> {
/// #         if s.as_bytes()[0] > 0 { vec![0] } else { vec![] }
/// #     }
/// #     fn apply(&self, s: &StateKey, _a: usize, _p: Player) -> Result<(StateKey, bool), GameError> {
/// #         let left = s.as_bytes()[0] - 1;
/// #         Ok((StateKey::from(vec![left]), left == 0))
/// #     }
/// #     fn encode_batch(&self, s: &[StateKey], _m: &[Player]) -> Result<EncodedBatch, GameError> {
/// #         Ok(EncodedBatch::zeros(s.len(), &[1]))
/// #     }
/// #     fn render(&self, s: &StateKey) -> String { format!("{:?}", s) }
/// # }
/// fn nim_factory() -> Box<dyn Game> {
///     Box::new(Nim)
/// }
///
/// register_game("nim".to_string(), nim_factory);
/// ```
pub fn register_game(env_id: String, factory: GameFactory) {
    let mut registry = registry();
    if registry.contains_key(&env_id) {
        warn!(env_id = %env_id, "Overriding existing game registration");
    }
    registry.insert(env_id, factory);
}

/// Create a new game instance by env_id.
///
/// Returns `None` (and logs a warning) if nothing is registered under that id.
pub fn create_game(env_id: &str) -> Option<Box<dyn Game>> {
    let registry = registry();
    match registry.get(env_id) {
        Some(factory) => Some(factory()),
        None => {
            warn!(env_id = %env_id, "Attempted to create unregistered game");
            None
        }
    }
}

/// All registered env_ids, sorted.
pub fn list_registered_games() -> Vec<String> {
    let mut ids: Vec<String> = registry().keys().cloned().collect();
    ids.sort();
    ids
}

/// Check if a game is registered
pub fn is_registered(env_id: &str) -> bool {
    registry().contains_key(env_id)
}

/// Clear all registered games (mainly for testing)
pub fn clear_registry() {
    registry().clear();
}
