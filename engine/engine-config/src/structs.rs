//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_env_id() -> String {
    defaults::env_id().into()
}
fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_c_puct() -> f64 {
    defaults::c_puct()
}
fn d_dirichlet_alpha() -> f64 {
    defaults::dirichlet_alpha()
}
fn d_dirichlet_weight() -> f64 {
    defaults::dirichlet_weight()
}
fn d_searches_per_move() -> u32 {
    defaults::searches_per_move()
}
fn d_batch_size() -> usize {
    defaults::search_batch_size()
}
fn d_plies_before_greedy() -> u32 {
    defaults::plies_before_greedy()
}
fn d_replay_capacity() -> usize {
    defaults::replay_capacity()
}
fn d_eval_rounds() -> u32 {
    defaults::eval_rounds()
}
fn d_eval_searches() -> u32 {
    defaults::eval_searches_per_move()
}
fn d_eval_batch_size() -> usize {
    defaults::eval_batch_size()
}
fn d_win_ratio() -> f64 {
    defaults::win_ratio()
}
fn d_max_episodes() -> i32 {
    defaults::max_episodes()
}
fn d_log_interval() -> u32 {
    defaults::log_interval()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub mcts: MctsConfig,
    #[serde(default)]
    pub selfplay: SelfPlayConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    #[serde(default)]
    pub actor: ActorConfig,
}

/// Common configuration shared by all components
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_env_id")]
    pub env_id: String,
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            env_id: defaults::env_id().into(),
            log_level: defaults::log_level().into(),
        }
    }
}

/// PUCT selection parameters
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MctsConfig {
    #[serde(default = "d_c_puct")]
    pub c_puct: f64,
    #[serde(default = "d_dirichlet_alpha")]
    pub dirichlet_alpha: f64,
    /// Mixing weight of root noise (0 disables it)
    #[serde(default = "d_dirichlet_weight")]
    pub dirichlet_weight: f64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            c_puct: defaults::c_puct(),
            dirichlet_alpha: defaults::dirichlet_alpha(),
            dirichlet_weight: defaults::dirichlet_weight(),
        }
    }
}

/// Self-play search budget and data retention
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SelfPlayConfig {
    /// Minibatches run before each move
    #[serde(default = "d_searches_per_move")]
    pub searches_per_move: u32,
    /// Descents per minibatch (one oracle call each)
    #[serde(default = "d_batch_size")]
    pub batch_size: usize,
    /// Plies sampled at temperature 1 before switching to greedy play
    #[serde(default = "d_plies_before_greedy")]
    pub plies_before_greedy: u32,
    #[serde(default = "d_replay_capacity")]
    pub replay_capacity: usize,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            searches_per_move: defaults::searches_per_move(),
            batch_size: defaults::search_batch_size(),
            plies_before_greedy: defaults::plies_before_greedy(),
            replay_capacity: defaults::replay_capacity(),
        }
    }
}

/// Arena evaluation between a challenger and the current best oracle
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EvaluationConfig {
    #[serde(default = "d_eval_rounds")]
    pub rounds: u32,
    #[serde(default = "d_eval_searches")]
    pub searches_per_move: u32,
    #[serde(default = "d_eval_batch_size")]
    pub batch_size: usize,
    /// Challenger win ratio above which it is promoted
    #[serde(default = "d_win_ratio")]
    pub win_ratio: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            rounds: defaults::eval_rounds(),
            searches_per_move: defaults::eval_searches_per_move(),
            batch_size: defaults::eval_batch_size(),
            win_ratio: defaults::win_ratio(),
        }
    }
}

/// Actor (self-play runner) configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ActorConfig {
    /// Games to play; negative means run until interrupted
    #[serde(default = "d_max_episodes")]
    pub max_episodes: i32,
    #[serde(default = "d_log_interval")]
    pub log_interval: u32,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            max_episodes: defaults::max_episodes(),
            log_interval: defaults::log_interval(),
        }
    }
}
