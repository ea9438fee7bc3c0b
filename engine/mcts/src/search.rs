//! Batched PUCT search.
//!
//! One minibatch runs `batch_size` descents from the same root against the
//! current tree, then:
//! 1. Terminal descents are queued for backup with their exact value
//! 2. Non-terminal leaves are deduplicated and encoded into one batch
//! 3. The oracle evaluates the batch in a single call
//! 4. Each new leaf gets a node, then every queued trajectory is backed up
//!
//! Descents within a minibatch see no statistics from each other, so with a
//! deterministic oracle and no root noise they all follow the same path.

use std::collections::HashMap;
use std::ops::AddAssign;
use std::time::Instant;

use engine_core::{Game, GameError, Player, StateKey};
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use rand_distr::{Distribution, Gamma};
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::MctsConfig;
use crate::node::{NodeStats, Step, Trajectory};
use crate::oracle::{EvalResult, Oracle, OracleError};
use crate::tree::MctsTree;

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Game error: {0}")]
    Game(#[from] GameError),

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("Malformed oracle output: {0}")]
    MalformedOracleOutput(String),

    #[error("State {0:?} has no record in the tree")]
    UnknownState(StateKey),

    #[error("State {0:?} already has a record")]
    NodeExists(StateKey),

    #[error("State {0:?} has no visits to derive a policy from")]
    NoVisits(StateKey),

    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Cannot sample from a distribution with no positive mass")]
    EmptyDistribution,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Outcome of one descent.
#[derive(Debug, Clone)]
pub struct Descent {
    /// Exact value for the player to move at `leaf` when the descent ended
    /// in a terminal position, `None` when the leaf needs the oracle.
    pub value: Option<f32>,
    pub leaf: StateKey,
    pub leaf_player: Player,
    pub trajectory: Trajectory,
}

/// Counters and timings accumulated over minibatches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub descents: u32,
    pub terminal_hits: u32,
    pub oracle_batches: u32,
    pub oracle_evaluations: u32,
    /// Descents whose leaf was already pending in the same minibatch
    pub deduplicated_leaves: u32,
    pub selection_us: u64,
    pub inference_us: u64,
    pub expansion_us: u64,
    pub backup_us: u64,
}

impl AddAssign for SearchStats {
    fn add_assign(&mut self, other: Self) {
        self.descents += other.descents;
        self.terminal_hits += other.terminal_hits;
        self.oracle_batches += other.oracle_batches;
        self.oracle_evaluations += other.oracle_evaluations;
        self.deduplicated_leaves += other.deduplicated_leaves;
        self.selection_us += other.selection_us;
        self.inference_us += other.inference_us;
        self.expansion_us += other.expansion_us;
        self.backup_us += other.backup_us;
    }
}

/// Search over a borrowed tree store.
pub struct MctsSearch<'a, G: Game + ?Sized, O: Oracle + ?Sized> {
    tree: &'a mut MctsTree,
    game: &'a G,
    oracle: &'a O,
    config: &'a MctsConfig,
}

impl<'a, G: Game + ?Sized, O: Oracle + ?Sized> MctsSearch<'a, G, O> {
    /// Bind a tree store, game, oracle and selection parameters.
    pub fn new(
        tree: &'a mut MctsTree,
        game: &'a G,
        oracle: &'a O,
        config: &'a MctsConfig,
    ) -> Result<Self, SearchError> {
        config.validate()?;
        if tree.action_space() != game.action_space() {
            return Err(SearchError::InvalidConfig(format!(
                "tree action space {} does not match game {} action space {}",
                tree.action_space(),
                game.env_id(),
                game.action_space()
            )));
        }
        Ok(Self {
            tree,
            game,
            oracle,
            config,
        })
    }

    /// Get the tree store (for inspection/debugging).
    pub fn tree(&self) -> &MctsTree {
        self.tree
    }

    /// Descend from `root` by PUCT until reaching a state with no record or
    /// a terminal position.
    pub fn find_leaf(
        &self,
        root: &StateKey,
        player: Player,
        rng: &mut ChaCha20Rng,
    ) -> Result<Descent, SearchError> {
        let mut state = root.clone();
        let mut player = player;
        let mut trajectory = Vec::new();

        while let Some(node) = self.tree.node_id(&state) {
            let stats = self.tree.stats(node);

            let noised;
            let priors = if self.config.noise_enabled() && state == *root {
                noised = self.noisy_priors(stats.prior, rng)?;
                &noised[..]
            } else {
                stats.prior
            };

            let mut scores = puct_scores(&stats, priors, self.config.c_puct);
            mask_illegal(&mut scores, &self.game.illegal_moves(&state));
            let action = match argmax(&scores) {
                Some(a) if scores[a] > f32::NEG_INFINITY => a,
                _ => return Err(SearchError::NoLegalMoves),
            };

            trajectory.push(Step {
                node,
                player,
                action,
            });
            let (next, won) = self.game.apply(&state, action, player)?;
            state = next;
            player = player.opponent();

            // The player now to move has just lost.
            if won {
                return Ok(Descent {
                    value: Some(-1.0),
                    leaf: state,
                    leaf_player: player,
                    trajectory,
                });
            }
            if self.game.legal_moves(&state).is_empty() {
                return Ok(Descent {
                    value: Some(0.0),
                    leaf: state,
                    leaf_player: player,
                    trajectory,
                });
            }
        }

        Ok(Descent {
            value: None,
            leaf: state,
            leaf_player: player,
            trajectory,
        })
    }

    fn noisy_priors(&self, priors: &[f32], rng: &mut ChaCha20Rng) -> Result<Vec<f32>, SearchError> {
        let noise = dirichlet_noise(priors.len(), self.config.dirichlet_alpha, rng)?;
        let eps = self.config.dirichlet_epsilon;
        Ok(priors
            .iter()
            .zip(&noise)
            .map(|(p, n)| (1.0 - eps) * p + eps * n)
            .collect())
    }

    /// Run `batch_size` descents and one oracle call, then back up every
    /// trajectory.
    pub fn search_minibatch(
        &mut self,
        batch_size: usize,
        root: &StateKey,
        player: Player,
        rng: &mut ChaCha20Rng,
    ) -> Result<SearchStats, SearchError> {
        let mut stats = SearchStats::default();
        let mut backup_queue: Vec<(f32, Trajectory)> = Vec::with_capacity(batch_size);
        let mut pending_states: Vec<StateKey> = Vec::new();
        let mut pending_players: Vec<Player> = Vec::new();
        let mut pending_index: HashMap<StateKey, usize> = HashMap::new();
        let mut waiting: Vec<(usize, Trajectory)> = Vec::new();

        let start = Instant::now();
        for _ in 0..batch_size {
            let descent = self.find_leaf(root, player, rng)?;
            stats.descents += 1;
            match descent.value {
                Some(value) => {
                    stats.terminal_hits += 1;
                    backup_queue.push((value, descent.trajectory));
                }
                None => {
                    let slot = match pending_index.get(&descent.leaf) {
                        Some(&slot) => {
                            stats.deduplicated_leaves += 1;
                            slot
                        }
                        None => {
                            let slot = pending_states.len();
                            pending_index.insert(descent.leaf.clone(), slot);
                            pending_states.push(descent.leaf);
                            pending_players.push(descent.leaf_player);
                            slot
                        }
                    };
                    waiting.push((slot, descent.trajectory));
                }
            }
        }
        stats.selection_us = start.elapsed().as_micros() as u64;

        if !pending_states.is_empty() {
            let start = Instant::now();
            let batch = self.game.encode_batch(&pending_states, &pending_players)?;
            let results = self.oracle.evaluate(&batch)?;
            stats.inference_us = start.elapsed().as_micros() as u64;
            stats.oracle_batches = 1;
            stats.oracle_evaluations = pending_states.len() as u32;

            validate_oracle_output(&results, pending_states.len(), self.tree.action_space())?;

            let start = Instant::now();
            let values: Vec<f32> = results.iter().map(|r| r.value).collect();
            for (state, result) in pending_states.into_iter().zip(&results) {
                self.tree.create_node(state, &result.policy)?;
            }
            for (slot, trajectory) in waiting {
                backup_queue.push((values[slot], trajectory));
            }
            stats.expansion_us = start.elapsed().as_micros() as u64;
        }

        let start = Instant::now();
        for (value, trajectory) in &backup_queue {
            self.tree.backup(*value, trajectory);
        }
        stats.backup_us = start.elapsed().as_micros() as u64;

        trace!(
            descents = stats.descents,
            terminal = stats.terminal_hits,
            evaluated = stats.oracle_evaluations,
            deduplicated = stats.deduplicated_leaves,
            "Minibatch complete"
        );
        Ok(stats)
    }

    /// Run `count` minibatches of `batch_size` descents from `root`.
    pub fn search_batch(
        &mut self,
        count: u32,
        batch_size: usize,
        root: &StateKey,
        player: Player,
        rng: &mut ChaCha20Rng,
    ) -> Result<SearchStats, SearchError> {
        if batch_size == 0 {
            return Err(SearchError::InvalidConfig(
                "batch_size must be positive".to_string(),
            ));
        }
        let mut total = SearchStats::default();
        for _ in 0..count {
            total += self.search_minibatch(batch_size, root, player, rng)?;
        }
        debug!(
            root = ?root,
            player = %player,
            nodes = self.tree.len(),
            descents = total.descents,
            oracle_evaluations = total.oracle_evaluations,
            "Search complete"
        );
        Ok(total)
    }
}

/// Reject oracle output that would corrupt the tree. Prior sums are not
/// checked.
fn validate_oracle_output(
    results: &[EvalResult],
    expected: usize,
    action_space: usize,
) -> Result<(), SearchError> {
    if results.len() != expected {
        return Err(SearchError::MalformedOracleOutput(format!(
            "expected {} results, got {}",
            expected,
            results.len()
        )));
    }
    for (i, r) in results.iter().enumerate() {
        if r.policy.len() != action_space {
            return Err(SearchError::MalformedOracleOutput(format!(
                "result {}: policy length {} does not match action space {}",
                i,
                r.policy.len(),
                action_space
            )));
        }
        if r.policy.iter().any(|p| !p.is_finite()) {
            return Err(SearchError::MalformedOracleOutput(format!(
                "result {}: non-finite prior",
                i
            )));
        }
        if !r.value.is_finite() || !(-1.0..=1.0).contains(&r.value) {
            return Err(SearchError::MalformedOracleOutput(format!(
                "result {}: value {} outside [-1, 1]",
                i, r.value
            )));
        }
    }
    Ok(())
}

/// `mean[a] + c_puct * prior[a] * sqrt(total visits) / (1 + visits[a])`
pub fn puct_scores(stats: &NodeStats<'_>, priors: &[f32], c_puct: f32) -> Vec<f32> {
    let sqrt_total = (stats.total_visits() as f32).sqrt();
    stats
        .mean_value
        .iter()
        .zip(stats.visit_count)
        .zip(priors)
        .map(|((&q, &n), &p)| q + c_puct * p * sqrt_total / (1.0 + n as f32))
        .collect()
}

/// Set the score of every listed action to negative infinity.
pub fn mask_illegal(scores: &mut [f32], illegal: &[usize]) {
    for &a in illegal {
        if let Some(s) = scores.get_mut(a) {
            *s = f32::NEG_INFINITY;
        }
    }
}

/// Index of the maximum score, lowest index on ties. `None` when empty.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &s) in scores.iter().enumerate() {
        match best {
            Some((_, b)) if s <= b => {}
            _ if s.is_nan() => {}
            _ => best = Some((i, s)),
        }
    }
    best.map(|(i, _)| i)
}

/// Sample an action from a probability distribution.
pub fn sample_action(distribution: &[f32], rng: &mut ChaCha20Rng) -> Result<usize, SearchError> {
    let total: f32 = distribution.iter().filter(|p| **p > 0.0).sum();
    if total <= 0.0 || !total.is_finite() {
        return Err(SearchError::EmptyDistribution);
    }

    let r: f32 = rng.gen::<f32>() * total;
    let mut cumsum = 0.0;
    for (i, &p) in distribution.iter().enumerate() {
        if p > 0.0 {
            cumsum += p;
            if r < cumsum {
                return Ok(i);
            }
        }
    }

    // Fallback to last non-zero action (handles floating point issues)
    distribution
        .iter()
        .rposition(|&p| p > 0.0)
        .ok_or(SearchError::EmptyDistribution)
}

/// Generate Dirichlet-distributed noise using Gamma variates.
pub fn dirichlet_noise(
    n: usize,
    alpha: f32,
    rng: &mut ChaCha20Rng,
) -> Result<Vec<f32>, SearchError> {
    let gamma = Gamma::new(alpha as f64, 1.0).map_err(|e| {
        SearchError::InvalidConfig(format!("dirichlet_alpha {}: {}", alpha, e))
    })?;
    let mut samples: Vec<f32> = (0..n).map(|_| gamma.sample(rng) as f32).collect();

    // Normalize
    let sum: f32 = samples.iter().sum();
    if sum > 0.0 {
        for s in &mut samples {
            *s /= sum;
        }
    } else if n > 0 {
        // Tiny alpha can underflow every variate to zero.
        samples.fill(1.0 / n as f32);
    }

    Ok(samples)
}
