//! Configuration for the actor binary
//!
//! Defaults come from the central config (config.toml plus `CARO_ZERO_*`
//! environment overrides, see `engine-config`). CLI arguments take highest
//! priority.

use anyhow::{anyhow, Result};
use clap::Parser;
use engine_config::{load_config, CentralConfig};
use mcts::MctsConfig;
use once_cell::sync::Lazy;
use tracing::level_filters::LevelFilter;

use crate::selfplay::SelfPlayConfig;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

fn default_env_id() -> String {
    CENTRAL_CONFIG.common.env_id.clone()
}

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

fn default_episodes() -> i32 {
    CENTRAL_CONFIG.actor.max_episodes
}

fn default_log_interval() -> u32 {
    CENTRAL_CONFIG.actor.log_interval
}

fn default_c_puct() -> f32 {
    CENTRAL_CONFIG.mcts.c_puct as f32
}

fn default_dirichlet_alpha() -> f32 {
    CENTRAL_CONFIG.mcts.dirichlet_alpha as f32
}

fn default_dirichlet_weight() -> f32 {
    CENTRAL_CONFIG.mcts.dirichlet_weight as f32
}

fn default_searches_per_move() -> u32 {
    CENTRAL_CONFIG.selfplay.searches_per_move
}

fn default_batch_size() -> usize {
    CENTRAL_CONFIG.selfplay.batch_size
}

fn default_plies_before_greedy() -> u32 {
    CENTRAL_CONFIG.selfplay.plies_before_greedy
}

fn default_replay_capacity() -> usize {
    CENTRAL_CONFIG.selfplay.replay_capacity
}

fn default_eval_rounds() -> u32 {
    CENTRAL_CONFIG.evaluation.rounds
}

fn default_eval_searches_per_move() -> u32 {
    CENTRAL_CONFIG.evaluation.searches_per_move
}

fn default_eval_batch_size() -> usize {
    CENTRAL_CONFIG.evaluation.batch_size
}

fn default_win_ratio() -> f64 {
    CENTRAL_CONFIG.evaluation.win_ratio
}

#[derive(Parser, Debug, Clone)]
#[command(name = "actor")]
#[command(about = "Caro self-play actor - batched PUCT search and replay generation")]
#[command(
    long_about = "Actor that plays self-play games with batched PUCT search and collects
(state, mover, policy, outcome) samples in an in-memory replay buffer.

Configuration is loaded from config.toml with CARO_ZERO_* environment variable
overrides. CLI arguments take highest priority."
)]
pub struct Config {
    /// Game variant to play (e.g., tictactoe, caro7x7, caro15x15)
    #[arg(long, default_value_t = default_env_id())]
    pub env_id: String,

    /// Number of self-play games to run (-1 for unlimited)
    #[arg(long, default_value_t = default_episodes(), allow_negative_numbers = true)]
    pub episodes: i32,

    /// Search minibatches run before every move
    #[arg(long, default_value_t = default_searches_per_move())]
    pub searches_per_move: u32,

    /// Descents per search minibatch
    #[arg(long, default_value_t = default_batch_size())]
    pub batch_size: usize,

    /// Plies sampled at temperature 1 before switching to greedy play
    #[arg(long, default_value_t = default_plies_before_greedy())]
    pub plies_before_greedy: u32,

    /// Maximum samples kept in the replay buffer
    #[arg(long, default_value_t = default_replay_capacity())]
    pub replay_capacity: usize,

    /// PUCT exploration constant
    #[arg(long, default_value_t = default_c_puct())]
    pub c_puct: f32,

    /// Dirichlet concentration for root noise (0 disables noise)
    #[arg(long, default_value_t = default_dirichlet_alpha())]
    pub dirichlet_alpha: f32,

    /// Weight of root noise in the mixed prior (0 disables noise)
    #[arg(long, default_value_t = default_dirichlet_weight())]
    pub dirichlet_weight: f32,

    /// RNG seed for reproducible runs (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Log progress every N episodes (0 to disable)
    #[arg(long, default_value_t = default_log_interval())]
    pub log_interval: u32,

    /// Arena rounds against itself after self-play (0 to disable)
    #[arg(long, default_value_t = default_eval_rounds())]
    pub eval_rounds: u32,

    /// Search minibatches per move during arena games
    #[arg(long, default_value_t = default_eval_searches_per_move())]
    pub eval_searches_per_move: u32,

    /// Descents per minibatch during arena games
    #[arg(long, default_value_t = default_eval_batch_size())]
    pub eval_batch_size: usize,

    /// Challenger win ratio required for promotion
    #[arg(long, default_value_t = default_win_ratio())]
    pub win_ratio: f64,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.env_id.is_empty() {
            return Err(anyhow!("env_id cannot be empty"));
        }

        if self.searches_per_move == 0 {
            return Err(anyhow!("searches_per_move must be greater than 0"));
        }

        if self.batch_size == 0 {
            return Err(anyhow!("batch_size must be greater than 0"));
        }

        if self.replay_capacity == 0 {
            return Err(anyhow!("replay_capacity must be greater than 0"));
        }

        if self.eval_rounds > 0 && (self.eval_searches_per_move == 0 || self.eval_batch_size == 0)
        {
            return Err(anyhow!(
                "eval_searches_per_move and eval_batch_size must be greater than 0"
            ));
        }

        if !(0.0..=1.0).contains(&self.win_ratio) {
            return Err(anyhow!(
                "win_ratio must be within [0, 1], got {}",
                self.win_ratio
            ));
        }

        self.mcts_config()
            .validate()
            .map_err(|e| anyhow!("invalid search parameters: {}", e))?;

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        Ok(())
    }

    pub fn mcts_config(&self) -> MctsConfig {
        MctsConfig::default()
            .with_c_puct(self.c_puct)
            .with_dirichlet(self.dirichlet_alpha, self.dirichlet_weight)
    }

    pub fn selfplay_config(&self) -> SelfPlayConfig {
        SelfPlayConfig {
            mcts: self.mcts_config(),
            searches_per_move: self.searches_per_move,
            batch_size: self.batch_size,
            plies_before_greedy: self.plies_before_greedy,
        }
    }

    /// Arena games keep the self-play noise settings.
    pub fn arena_config(&self) -> SelfPlayConfig {
        SelfPlayConfig {
            mcts: self.mcts_config(),
            searches_per_move: self.eval_searches_per_move,
            batch_size: self.eval_batch_size,
            plies_before_greedy: 0,
        }
    }

    pub fn unlimited(&self) -> bool {
        self.episodes < 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            env_id: "tictactoe".into(),
            episodes: 1,
            searches_per_move: 10,
            batch_size: 32,
            plies_before_greedy: 10,
            replay_capacity: 10_000,
            c_puct: 1.5,
            dirichlet_alpha: 0.03,
            dirichlet_weight: 0.25,
            seed: Some(7),
            log_level: "info".into(),
            log_interval: 10,
            eval_rounds: 20,
            eval_searches_per_move: 20,
            eval_batch_size: 16,
            win_ratio: 0.55,
        }
    }

    #[test]
    fn validate_accepts_valid_configuration() {
        let cfg = base_config();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_env_id() {
        let mut cfg = base_config();
        cfg.env_id.clear();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("env_id"));
    }

    #[test]
    fn validate_rejects_zero_searches_per_move() {
        let mut cfg = base_config();
        cfg.searches_per_move = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("searches_per_move"));
    }

    #[test]
    fn validate_rejects_zero_batch_size() {
        let mut cfg = base_config();
        cfg.batch_size = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("batch_size"));
    }

    #[test]
    fn validate_rejects_zero_replay_capacity() {
        let mut cfg = base_config();
        cfg.replay_capacity = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("replay_capacity"));
    }

    #[test]
    fn validate_ignores_eval_settings_when_arena_disabled() {
        let mut cfg = base_config();
        cfg.eval_rounds = 0;
        cfg.eval_batch_size = 0;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_eval_batch_when_arena_enabled() {
        let mut cfg = base_config();
        cfg.eval_batch_size = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("eval_batch_size"));
    }

    #[test]
    fn validate_rejects_out_of_range_win_ratio() {
        let mut cfg = base_config();
        cfg.win_ratio = 1.5;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("win_ratio"));
    }

    #[test]
    fn validate_rejects_negative_c_puct() {
        let mut cfg = base_config();
        cfg.c_puct = -0.5;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("c_puct"));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut cfg = base_config();
        cfg.log_level = "nope".into();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("invalid log level"));
    }

    #[test]
    fn validate_accepts_negative_episodes() {
        let mut cfg = base_config();
        cfg.episodes = -1;
        assert!(cfg.validate().is_ok());
        assert!(cfg.unlimited());
    }

    #[test]
    fn selfplay_config_maps_cli_values() {
        let cfg = base_config();
        let sp = cfg.selfplay_config();
        assert_eq!(sp.searches_per_move, 10);
        assert_eq!(sp.batch_size, 32);
        assert_eq!(sp.plies_before_greedy, 10);
        assert_eq!(sp.mcts.c_puct, 1.5);
        assert_eq!(sp.mcts.dirichlet_alpha, 0.03);
        assert_eq!(sp.mcts.dirichlet_epsilon, 0.25);
    }

    #[test]
    fn arena_config_is_greedy() {
        let cfg = base_config();
        let arena = cfg.arena_config();
        assert_eq!(arena.plies_before_greedy, 0);
        assert_eq!(arena.searches_per_move, 20);
        assert_eq!(arena.batch_size, 16);
    }

    #[test]
    fn cli_overrides_defaults() {
        let cfg = Config::parse_from([
            "actor",
            "--env-id",
            "caro9x9",
            "--episodes",
            "-1",
            "--batch-size",
            "8",
            "--seed",
            "42",
        ]);
        assert_eq!(cfg.env_id, "caro9x9");
        assert_eq!(cfg.episodes, -1);
        assert_eq!(cfg.batch_size, 8);
        assert_eq!(cfg.seed, Some(42));
    }
}
