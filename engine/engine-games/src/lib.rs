//! Game registration for the caro-zero engine
//!
//! This crate provides a single initialization point for registering all
//! available games with the engine-core registry.
//!
//! # Usage
//!
//! ```rust
//! use engine_games::register_all_games;
//!
//! // Call once at startup - safe to call multiple times
//! register_all_games();
//! assert!(engine_core::is_registered("caro7x7"));
//! ```

use std::sync::Once;

static INIT: Once = Once::new();

/// Register all available games with the engine-core registry.
///
/// This function uses `std::sync::Once` to ensure registration only
/// happens once, even if called multiple times. Safe to call from
/// multiple threads.
///
/// Currently registers every Caro variant in [`games_caro::VARIANTS`],
/// from `"tictactoe"` up to `"caro19x19"`.
pub fn register_all_games() {
    INIT.call_once(|| {
        games_caro::register_caro();
    });
}

// Re-export individual registration functions for advanced use cases
pub use games_caro::register_caro;

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{create_game, is_registered, list_registered_games};
    use games_caro::VARIANTS;

    #[test]
    fn test_register_all_games() {
        register_all_games();

        for (id, _, _) in VARIANTS {
            assert!(is_registered(id), "{} should be registered", id);
        }
    }

    #[test]
    fn test_register_all_games_idempotent() {
        register_all_games();
        register_all_games();
        register_all_games();

        let games = list_registered_games();
        let tictactoe_count = games.iter().filter(|g| *g == "tictactoe").count();
        let caro_count = games.iter().filter(|g| *g == "caro19x19").count();

        assert_eq!(tictactoe_count, 1);
        assert_eq!(caro_count, 1);
    }

    #[test]
    fn test_registered_variants_have_expected_boards() {
        register_all_games();

        for (id, len, _) in VARIANTS {
            let game = create_game(id).unwrap();
            assert_eq!(game.env_id(), id);
            assert_eq!(game.action_space(), len * len);
        }
    }
}
