//! Game trait consumed by the search engine and the self-play driver.
//!
//! The search never looks inside a position. Everything it needs (legal
//! actions, transitions, win detection, network input) goes through this
//! trait, keyed by [`StateKey`].

use thiserror::Error;

use crate::state::{Player, StateKey};

/// Errors raised by game implementations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GameError {
    #[error("Illegal move {action} in state {state:?}")]
    IllegalMove { action: usize, state: StateKey },

    #[error("Invalid state key: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("Corrupted state key: {0}")]
    CorruptedKey(String),

    #[error("Batch shape mismatch: {states} states but {movers} movers")]
    BatchMismatch { states: usize, movers: usize },
}

/// A batch of encoded positions ready for the oracle.
///
/// `data` is a dense row-major `f32` buffer of shape `[batch, obs_shape...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedBatch {
    pub batch_size: usize,
    pub obs_shape: Vec<usize>,
    pub data: Vec<f32>,
}

impl EncodedBatch {
    /// Allocate a zeroed batch.
    pub fn zeros(batch_size: usize, obs_shape: &[usize]) -> Self {
        let sample_len: usize = obs_shape.iter().product();
        Self {
            batch_size,
            obs_shape: obs_shape.to_vec(),
            data: vec![0.0; batch_size * sample_len],
        }
    }

    /// Number of floats per sample.
    #[inline]
    pub fn sample_len(&self) -> usize {
        self.obs_shape.iter().product()
    }

    /// Borrow one sample.
    pub fn sample(&self, index: usize) -> &[f32] {
        let len = self.sample_len();
        &self.data[index * len..(index + 1) * len]
    }

    /// Mutably borrow one sample.
    pub fn sample_mut(&mut self, index: usize) -> &mut [f32] {
        let len = self.sample_len();
        &mut self.data[index * len..(index + 1) * len]
    }
}

/// Two-player, zero-sum, perfect-information game.
///
/// Implementations are pure with respect to `&self`: every method maps keys
/// to keys, so one instance can serve any number of searches.
pub trait Game: Send + Sync + std::fmt::Debug {
    /// Registry identifier (e.g. `"caro7x7"`).
    fn env_id(&self) -> &str;

    /// Starting position.
    fn initial_state(&self) -> StateKey;

    /// Size of the fixed action space, legal or not.
    fn action_space(&self) -> usize;

    /// Per-sample shape of [`Game::encode_batch`] output.
    fn obs_shape(&self) -> Vec<usize>;

    /// Actions that may be applied to `state`, in ascending order.
    fn legal_moves(&self, state: &StateKey) -> Vec<usize>;

    /// Complement of [`Game::legal_moves`] within `0..action_space`.
    fn illegal_moves(&self, state: &StateKey) -> Vec<usize> {
        let mut legal = vec![false; self.action_space()];
        for a in self.legal_moves(state) {
            legal[a] = true;
        }
        legal
            .iter()
            .enumerate()
            .filter(|(_, &ok)| !ok)
            .map(|(a, _)| a)
            .collect()
    }

    /// Apply `action` for `player`. Returns the new state and whether the
    /// mover has just won.
    fn apply(
        &self,
        state: &StateKey,
        action: usize,
        player: Player,
    ) -> Result<(StateKey, bool), GameError>;

    /// Encode positions from each mover's point of view.
    fn encode_batch(
        &self,
        states: &[StateKey],
        movers: &[Player],
    ) -> Result<EncodedBatch, GameError>;

    /// Human-readable board, for diagnostics only.
    fn render(&self, state: &StateKey) -> String;
}
