//! Default configuration values loaded from config.defaults.toml.
//!
//! This module loads defaults from the shared TOML file at compile time, so
//! every binary and test sees the same values.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    mcts: MctsDefaults,
    selfplay: SelfPlayDefaults,
    evaluation: EvaluationDefaults,
    actor: ActorDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    env_id: String,
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct MctsDefaults {
    c_puct: f64,
    dirichlet_alpha: f64,
    dirichlet_weight: f64,
}

#[derive(Debug, Deserialize)]
struct SelfPlayDefaults {
    searches_per_move: u32,
    batch_size: usize,
    plies_before_greedy: u32,
    replay_capacity: usize,
}

#[derive(Debug, Deserialize)]
struct EvaluationDefaults {
    rounds: u32,
    searches_per_move: u32,
    batch_size: usize,
    win_ratio: f64,
}

#[derive(Debug, Deserialize)]
struct ActorDefaults {
    max_episodes: i32,
    log_interval: u32,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn env_id() -> &'static str {
    &DEFAULTS.common.env_id
}
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// MCTS
pub fn c_puct() -> f64 {
    DEFAULTS.mcts.c_puct
}
pub fn dirichlet_alpha() -> f64 {
    DEFAULTS.mcts.dirichlet_alpha
}
pub fn dirichlet_weight() -> f64 {
    DEFAULTS.mcts.dirichlet_weight
}

// Self-play
pub fn searches_per_move() -> u32 {
    DEFAULTS.selfplay.searches_per_move
}
pub fn search_batch_size() -> usize {
    DEFAULTS.selfplay.batch_size
}
pub fn plies_before_greedy() -> u32 {
    DEFAULTS.selfplay.plies_before_greedy
}
pub fn replay_capacity() -> usize {
    DEFAULTS.selfplay.replay_capacity
}

// Evaluation
pub fn eval_rounds() -> u32 {
    DEFAULTS.evaluation.rounds
}
pub fn eval_searches_per_move() -> u32 {
    DEFAULTS.evaluation.searches_per_move
}
pub fn eval_batch_size() -> usize {
    DEFAULTS.evaluation.batch_size
}
pub fn win_ratio() -> f64 {
    DEFAULTS.evaluation.win_ratio
}

// Actor
pub fn max_episodes() -> i32 {
    DEFAULTS.actor.max_episodes
}
pub fn log_interval() -> u32 {
    DEFAULTS.actor.log_interval
}
