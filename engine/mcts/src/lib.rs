//! Batched Monte Carlo Tree Search with oracle priors (PUCT).
//!
//! This crate provides a game-agnostic search that works with any game
//! implementing the `engine-core` [`Game`](engine_core::Game) trait.
//!
//! # Overview
//!
//! Statistics live in a [`MctsTree`] keyed by canonical state, owned by the
//! caller and shared across moves (and games) until explicitly cleared. Each
//! search minibatch:
//!
//! 1. **Selection**: runs several descents by PUCT from the same root, with
//!    fresh Dirichlet noise mixed into the root priors on every descent
//! 2. **Evaluation**: encodes every newly discovered leaf and evaluates them
//!    in a single [`Oracle`] call
//! 3. **Expansion**: records one node per new leaf
//! 4. **Backup**: credits every trajectory with its leaf value, flipping the
//!    sign at each ply
//!
//! # Usage
//!
//! ```rust,ignore
//! use engine_core::{Game, Player};
//! use games_caro::CaroGame;
//! use mcts::{MctsConfig, MctsSearch, MctsTree, UniformOracle};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let game = CaroGame::tictactoe();
//! let oracle = UniformOracle::new(game.action_space());
//! let config = MctsConfig::for_training();
//! let mut tree = MctsTree::new(game.action_space());
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//!
//! let root = game.initial_state();
//! let mut search = MctsSearch::new(&mut tree, &game, &oracle, &config)?;
//! search.search_batch(10, 32, &root, Player::White, &mut rng)?;
//!
//! let policy = tree.policy(&root, 1.0)?;
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls selection:
//!
//! - `c_puct`: Exploration constant (default: 1.5)
//! - `dirichlet_alpha`: Root noise concentration (default: 0.03)
//! - `dirichlet_epsilon`: Root noise mixing weight (default: 0.25)

pub mod config;
pub mod node;
pub mod oracle;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::MctsConfig;
pub use node::{NodeId, NodeStats, Step, Trajectory};
pub use oracle::{EvalResult, Oracle, OracleError, UniformOracle};
pub use search::{
    argmax, dirichlet_noise, mask_illegal, puct_scores, sample_action, Descent, MctsSearch,
    SearchError, SearchStats,
};
pub use tree::{MctsTree, TreeStats};
