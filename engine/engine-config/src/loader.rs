//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::Path;
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "CARO_ZERO_CONFIG";

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from a crate directory)
];

/// Load the central configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by the CARO_ZERO_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    // Check for explicit config path
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let path = Path::new(&path);
        if path.exists() {
            info!("Loading config from {}: {}", CONFIG_PATH_ENV, path.display());
            return load_from_path(path);
        }
        warn!(
            "{}={} not found, searching defaults",
            CONFIG_PATH_ENV,
            path.display()
        );
    }

    // Search default locations
    for path_str in CONFIG_SEARCH_PATHS {
        let path = Path::new(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(path);
        }
    }

    // Fall back to defaults
    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
///
/// Unreadable or unparsable files fall back to the built-in defaults with a
/// warning; env overrides are applied either way.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u32, usize, f64, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(raw) = std::env::var($key) {
            match raw.parse() {
                Ok(v) => $config.$section.$field = v,
                Err(_) => warn!("Ignoring {}={}: not a valid value", $key, raw),
            }
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: CARO_ZERO_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.env_id, "CARO_ZERO_COMMON_ENV_ID");
    env_override!(config, common.log_level, "CARO_ZERO_COMMON_LOG_LEVEL");

    // MCTS
    env_override!(config, mcts.c_puct, "CARO_ZERO_MCTS_C_PUCT", parse);
    env_override!(
        config,
        mcts.dirichlet_alpha,
        "CARO_ZERO_MCTS_DIRICHLET_ALPHA",
        parse
    );
    env_override!(
        config,
        mcts.dirichlet_weight,
        "CARO_ZERO_MCTS_DIRICHLET_WEIGHT",
        parse
    );

    // Self-play
    env_override!(
        config,
        selfplay.searches_per_move,
        "CARO_ZERO_SELFPLAY_SEARCHES_PER_MOVE",
        parse
    );
    env_override!(
        config,
        selfplay.batch_size,
        "CARO_ZERO_SELFPLAY_BATCH_SIZE",
        parse
    );
    env_override!(
        config,
        selfplay.plies_before_greedy,
        "CARO_ZERO_SELFPLAY_PLIES_BEFORE_GREEDY",
        parse
    );
    env_override!(
        config,
        selfplay.replay_capacity,
        "CARO_ZERO_SELFPLAY_REPLAY_CAPACITY",
        parse
    );

    // Evaluation
    env_override!(
        config,
        evaluation.rounds,
        "CARO_ZERO_EVALUATION_ROUNDS",
        parse
    );
    env_override!(
        config,
        evaluation.searches_per_move,
        "CARO_ZERO_EVALUATION_SEARCHES_PER_MOVE",
        parse
    );
    env_override!(
        config,
        evaluation.batch_size,
        "CARO_ZERO_EVALUATION_BATCH_SIZE",
        parse
    );
    env_override!(
        config,
        evaluation.win_ratio,
        "CARO_ZERO_EVALUATION_WIN_RATIO",
        parse
    );

    // Actor
    env_override!(
        config,
        actor.max_episodes,
        "CARO_ZERO_ACTOR_MAX_EPISODES",
        parse
    );
    env_override!(
        config,
        actor.log_interval,
        "CARO_ZERO_ACTOR_LOG_INTERVAL",
        parse
    );

    config
}
