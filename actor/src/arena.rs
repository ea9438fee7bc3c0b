//! Head-to-head evaluation between a challenger and the current champion.
//!
//! Each side searches in its own tree store so neither benefits from the
//! other's statistics. The stores live for one [`evaluate`] call and are
//! reused across its rounds. Play is greedy from the first move.

use engine_core::{Game, Player};
use mcts::{MctsTree, Oracle};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info, warn};

use crate::selfplay::{play_game, SelfPlayConfig, SelfPlayError, TreeStores};

/// Tally of an arena run, from the challenger's point of view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArenaReport {
    pub challenger_wins: u32,
    pub champion_wins: u32,
    pub draws: u32,
    /// Games abandoned on error, not counted in the ratio
    pub failed: u32,
}

impl ArenaReport {
    pub fn games_counted(&self) -> u32 {
        self.challenger_wins + self.champion_wins + self.draws
    }

    /// Challenger wins over counted games, 0 when nothing was counted.
    pub fn win_ratio(&self) -> f64 {
        match self.games_counted() {
            0 => 0.0,
            n => self.challenger_wins as f64 / n as f64,
        }
    }

    /// Strictly above `threshold`.
    pub fn should_promote(&self, threshold: f64) -> bool {
        self.win_ratio() > threshold
    }
}

/// Play `rounds` games of `challenger` (White) against `champion` (Black)
/// with a random first mover each round.
///
/// Only an invalid configuration is returned as an error; games that fail
/// mid-way are logged and counted in [`ArenaReport::failed`].
pub fn evaluate<G, C, H>(
    game: &G,
    challenger: &C,
    champion: &H,
    rounds: u32,
    config: &SelfPlayConfig,
    rng: &mut ChaCha20Rng,
) -> Result<ArenaReport, SelfPlayError>
where
    G: Game + ?Sized,
    C: Oracle + ?Sized,
    H: Oracle + ?Sized,
{
    let config = SelfPlayConfig {
        plies_before_greedy: 0,
        ..config.clone()
    };
    config.validate()?;

    let mut challenger_tree = MctsTree::new(game.action_space());
    let mut champion_tree = MctsTree::new(game.action_space());
    let mut report = ArenaReport::default();

    for round in 0..rounds {
        let stores = TreeStores::PerPlayer {
            white: &mut challenger_tree,
            black: &mut champion_tree,
        };
        match play_game(game, stores, None, challenger, champion, &config, None, rng) {
            Ok(outcome) => {
                match outcome.winner {
                    Some(Player::White) => report.challenger_wins += 1,
                    Some(Player::Black) => report.champion_wins += 1,
                    None => report.draws += 1,
                }
                debug!(
                    round,
                    plies = outcome.plies,
                    winner = ?outcome.winner,
                    "Arena game finished"
                );
            }
            Err(e) => {
                report.failed += 1;
                warn!(round, error = %e, "Arena game failed, skipping");
            }
        }
    }

    info!(
        env_id = %game.env_id(),
        rounds,
        challenger_wins = report.challenger_wins,
        champion_wins = report.champion_wins,
        draws = report.draws,
        failed = report.failed,
        win_ratio = report.win_ratio(),
        "Arena complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use games_caro::CaroGame;
    use mcts::{MctsConfig, UniformOracle};
    use rand::SeedableRng;

    fn arena_config() -> SelfPlayConfig {
        SelfPlayConfig {
            mcts: MctsConfig::for_evaluation(),
            searches_per_move: 3,
            batch_size: 4,
            plies_before_greedy: 5,
        }
    }

    #[test]
    fn test_win_ratio_empty() {
        let report = ArenaReport::default();
        assert_eq!(report.win_ratio(), 0.0);
        assert!(!report.should_promote(0.0));
    }

    #[test]
    fn test_win_ratio_ignores_failed() {
        let report = ArenaReport {
            challenger_wins: 3,
            champion_wins: 1,
            draws: 0,
            failed: 6,
        };
        assert_eq!(report.games_counted(), 4);
        assert_eq!(report.win_ratio(), 0.75);
    }

    #[test]
    fn test_should_promote_is_strict() {
        let report = ArenaReport {
            challenger_wins: 11,
            champion_wins: 9,
            draws: 0,
            failed: 0,
        };
        assert!(report.should_promote(0.5));
        assert!(!report.should_promote(0.55));
    }

    #[test]
    fn test_evaluate_counts_every_round() {
        let game = CaroGame::tictactoe();
        let oracle = UniformOracle::new(9);
        let mut rng = ChaCha20Rng::seed_from_u64(99);

        let report = evaluate(&game, &oracle, &oracle, 6, &arena_config(), &mut rng).unwrap();
        assert_eq!(report.failed, 0);
        assert_eq!(report.games_counted(), 6);
    }

    #[test]
    fn test_evaluate_zero_rounds() {
        let game = CaroGame::tictactoe();
        let oracle = UniformOracle::new(9);
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        let report = evaluate(&game, &oracle, &oracle, 0, &arena_config(), &mut rng).unwrap();
        assert_eq!(report, ArenaReport::default());
    }

    #[test]
    fn test_evaluate_rejects_invalid_config() {
        let game = CaroGame::tictactoe();
        let oracle = UniformOracle::new(9);
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let mut config = arena_config();
        config.batch_size = 0;

        assert!(evaluate(&game, &oracle, &oracle, 2, &config, &mut rng).is_err());
    }

    #[test]
    fn test_broken_champion_games_are_skipped() {
        use engine_core::EncodedBatch;
        use mcts::{EvalResult, OracleError};

        struct BrokenOracle;
        impl Oracle for BrokenOracle {
            fn evaluate(&self, _batch: &EncodedBatch) -> Result<Vec<EvalResult>, OracleError> {
                Err(OracleError::ModelError("no weights".into()))
            }
        }

        let game = CaroGame::tictactoe();
        let challenger = UniformOracle::new(9);
        let mut rng = ChaCha20Rng::seed_from_u64(4);

        let report = evaluate(&game, &challenger, &BrokenOracle, 4, &arena_config(), &mut rng)
            .unwrap();
        // The champion fails on its first move, so every game is dropped.
        assert_eq!(report.failed, 4);
        assert_eq!(report.games_counted(), 0);
    }
}
