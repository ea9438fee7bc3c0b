//! Self-play game driver.
//!
//! Plays one full game between two oracles, searching before every move and
//! recording `(state, mover, distribution)` for each ply. When the game ends
//! the outcome is propagated backward through the record (the last mover
//! gets the result, the one before gets its negation, and so on) and the
//! finished samples are handed to an optional [`ReplaySink`].
//!
//! Oracle A always plays [`Player::White`], oracle B plays [`Player::Black`].

use engine_core::{Game, GameError, Player, StateKey};
use mcts::{sample_action, MctsConfig, MctsSearch, MctsTree, Oracle, SearchError, SearchStats};
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, error, trace};

use crate::replay::{ReplaySample, ReplaySink};

/// Errors that abort a single game.
#[derive(Debug, Error)]
pub enum SelfPlayError {
    #[error("Sampled action {action} is not legal in state {state:?}")]
    IllegalAction { action: usize, state: StateKey },

    #[error("Search failed: {0}")]
    Search(#[from] SearchError),

    #[error("Game error: {0}")]
    Game(#[from] GameError),

    #[error("Invalid self-play configuration: {0}")]
    InvalidConfig(String),
}

/// Parameters for one self-play game.
#[derive(Debug, Clone, PartialEq)]
pub struct SelfPlayConfig {
    pub mcts: MctsConfig,
    /// Minibatches run before each move
    pub searches_per_move: u32,
    /// Descents per minibatch
    pub batch_size: usize,
    /// Plies sampled at temperature 1 before switching to greedy play
    pub plies_before_greedy: u32,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            mcts: MctsConfig::for_training(),
            searches_per_move: 10,
            batch_size: 32,
            plies_before_greedy: 10,
        }
    }
}

impl SelfPlayConfig {
    pub fn validate(&self) -> Result<(), SelfPlayError> {
        if self.searches_per_move == 0 {
            return Err(SelfPlayError::InvalidConfig(
                "searches_per_move must be greater than 0".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(SelfPlayError::InvalidConfig(
                "batch_size must be greater than 0".to_string(),
            ));
        }
        self.mcts
            .validate()
            .map_err(|e| SelfPlayError::InvalidConfig(e.to_string()))
    }

    /// Temperature for the policy at `ply` (0-based).
    pub fn temperature(&self, ply: u32) -> f32 {
        if ply < self.plies_before_greedy {
            1.0
        } else {
            0.0
        }
    }
}

/// Which tree store each side searches in.
pub enum TreeStores<'a> {
    /// Both players share one store (self-play against oneself)
    Shared(&'a mut MctsTree),
    /// Each player keeps its own store (arena matches)
    PerPlayer {
        white: &'a mut MctsTree,
        black: &'a mut MctsTree,
    },
}

impl TreeStores<'_> {
    fn for_player(&mut self, player: Player) -> &mut MctsTree {
        match self {
            TreeStores::Shared(tree) => tree,
            TreeStores::PerPlayer { white, black } => match player {
                Player::White => white,
                Player::Black => black,
            },
        }
    }
}

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameOutcome {
    /// +1 if oracle A (White) won, -1 if it lost, 0 for a draw
    pub result_for_a: f32,
    /// Number of moves made
    pub plies: u32,
    pub winner: Option<Player>,
    /// Search counters summed over every move of the game
    pub stats: SearchStats,
}

/// Play one game to completion.
///
/// `first_mover` picks who opens; `None` chooses uniformly at random. On
/// error the game is abandoned and the tree stores keep whatever the
/// searches already recorded.
#[allow(clippy::too_many_arguments)]
pub fn play_game<G, A, B>(
    game: &G,
    mut stores: TreeStores<'_>,
    mut sink: Option<&mut dyn ReplaySink>,
    oracle_a: &A,
    oracle_b: &B,
    config: &SelfPlayConfig,
    first_mover: Option<Player>,
    rng: &mut ChaCha20Rng,
) -> Result<GameOutcome, SelfPlayError>
where
    G: Game + ?Sized,
    A: Oracle + ?Sized,
    B: Oracle + ?Sized,
{
    config.validate()?;

    let mut state = game.initial_state();
    let mut mover = first_mover.unwrap_or_else(|| {
        if rng.gen_bool(0.5) {
            Player::White
        } else {
            Player::Black
        }
    });
    let mut record: Vec<(StateKey, Player, Vec<f32>)> = Vec::new();
    let mut stats = SearchStats::default();
    let mut winner = None;
    let mut plies = 0u32;

    debug!(env_id = %game.env_id(), first_mover = %mover, "Starting game");

    loop {
        let legal = game.legal_moves(&state);
        if legal.is_empty() {
            break;
        }

        let temperature = config.temperature(plies);
        let tree = stores.for_player(mover);
        let (distribution, search_stats) = match mover {
            Player::White => {
                search_policy(tree, game, oracle_a, config, &state, mover, temperature, rng)?
            }
            Player::Black => {
                search_policy(tree, game, oracle_b, config, &state, mover, temperature, rng)?
            }
        };
        stats += search_stats;

        let action = sample_action(&distribution, rng)?;
        if !legal.contains(&action) {
            error!(
                action,
                player = %mover,
                ply = plies,
                "Sampled an illegal action\n{}",
                game.render(&state)
            );
            return Err(SelfPlayError::IllegalAction { action, state });
        }
        trace!(ply = plies, player = %mover, action, temperature, "Move");

        let (next, won) = game.apply(&state, action, mover)?;
        record.push((state, mover, distribution));
        plies += 1;

        if won {
            winner = Some(mover);
            break;
        }
        state = next;
        mover = mover.opponent();
    }

    // The last mover either won (+1) or filled the board (0).
    let mut result = if winner.is_some() { 1.0f32 } else { 0.0 };
    let mut samples = Vec::with_capacity(record.len());
    for (state, mover, distribution) in record.into_iter().rev() {
        samples.push(ReplaySample {
            state,
            mover,
            distribution,
            outcome: result,
        });
        result = -result;
    }
    if let Some(sink) = sink.as_deref_mut() {
        for sample in samples.into_iter().rev() {
            sink.append(sample);
        }
    }

    let result_for_a = match winner {
        Some(Player::White) => 1.0,
        Some(Player::Black) => -1.0,
        None => 0.0,
    };
    debug!(
        plies,
        winner = ?winner,
        descents = stats.descents,
        oracle_evaluations = stats.oracle_evaluations,
        "Game finished"
    );

    Ok(GameOutcome {
        result_for_a,
        plies,
        winner,
        stats,
    })
}

/// Search from `state` and read back the visit-count policy.
#[allow(clippy::too_many_arguments)]
fn search_policy<G, O>(
    tree: &mut MctsTree,
    game: &G,
    oracle: &O,
    config: &SelfPlayConfig,
    state: &StateKey,
    mover: Player,
    temperature: f32,
    rng: &mut ChaCha20Rng,
) -> Result<(Vec<f32>, SearchStats), SelfPlayError>
where
    G: Game + ?Sized,
    O: Oracle + ?Sized,
{
    let fresh_root = tree.is_leaf(state);
    let mut search = MctsSearch::new(tree, game, oracle, &config.mcts)?;
    let mut stats = SearchStats::default();
    // Expanding a fresh root backs up nothing, so it gets its own descent
    // on top of the `searches_per_move` minibatches that produce visits.
    if fresh_root {
        stats += search.search_minibatch(1, state, mover, rng)?;
    }
    stats += search.search_batch(
        config.searches_per_move,
        config.batch_size,
        state,
        mover,
        rng,
    )?;
    let distribution = tree.policy(state, temperature)?;
    Ok((distribution, stats))
}
