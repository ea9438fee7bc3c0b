//! Tests for the configuration module.

use super::*;
use once_cell::sync::Lazy;
use std::io::Write;
use std::sync::Mutex;

/// Env vars are process-global; tests that touch them run one at a time.
static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

#[test]
fn test_default_config() {
    let config = CentralConfig::default();
    assert_eq!(config.common.env_id, "caro7x7");
    assert_eq!(config.common.log_level, "info");
    assert_eq!(config.actor.max_episodes, -1);
    assert_eq!(config.actor.log_interval, 10);
}

#[test]
fn test_mcts_defaults() {
    let config = CentralConfig::default();
    assert!((config.mcts.c_puct - 1.5).abs() < f64::EPSILON);
    assert!((config.mcts.dirichlet_alpha - 0.03).abs() < f64::EPSILON);
    assert!((config.mcts.dirichlet_weight - 0.25).abs() < f64::EPSILON);
}

#[test]
fn test_selfplay_and_evaluation_defaults() {
    let config = CentralConfig::default();
    assert_eq!(config.selfplay.searches_per_move, 10);
    assert_eq!(config.selfplay.batch_size, 32);
    assert_eq!(config.selfplay.plies_before_greedy, 10);
    assert_eq!(config.selfplay.replay_capacity, 10_000);

    assert_eq!(config.evaluation.rounds, 20);
    assert_eq!(config.evaluation.searches_per_move, 20);
    assert_eq!(config.evaluation.batch_size, 16);
    assert!((config.evaluation.win_ratio - 0.55).abs() < f64::EPSILON);
}

#[test]
fn test_env_overrides() {
    let _guard = ENV_MUTEX.lock().unwrap();
    std::env::set_var("CARO_ZERO_COMMON_ENV_ID", "caro9x9");
    std::env::set_var("CARO_ZERO_SELFPLAY_BATCH_SIZE", "7");
    std::env::set_var("CARO_ZERO_MCTS_C_PUCT", "2.5");

    let config = apply_env_overrides(CentralConfig::default());
    assert_eq!(config.common.env_id, "caro9x9");
    assert_eq!(config.selfplay.batch_size, 7);
    assert!((config.mcts.c_puct - 2.5).abs() < f64::EPSILON);

    std::env::remove_var("CARO_ZERO_COMMON_ENV_ID");
    std::env::remove_var("CARO_ZERO_SELFPLAY_BATCH_SIZE");
    std::env::remove_var("CARO_ZERO_MCTS_C_PUCT");
}

#[test]
fn test_unparsable_env_override_is_ignored() {
    let _guard = ENV_MUTEX.lock().unwrap();
    std::env::set_var("CARO_ZERO_EVALUATION_ROUNDS", "many");

    let config = apply_env_overrides(CentralConfig::default());
    assert_eq!(config.evaluation.rounds, 20);

    std::env::remove_var("CARO_ZERO_EVALUATION_ROUNDS");
}

#[test]
fn test_parse_config_toml() {
    let toml_content = r#"
[common]
env_id = "caro15x15"

[mcts]
c_puct = 2.0

[selfplay]
searches_per_move = 50
plies_before_greedy = 0

[evaluation]
rounds = 100
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.common.env_id, "caro15x15");
    assert!((config.mcts.c_puct - 2.0).abs() < f64::EPSILON);
    assert_eq!(config.selfplay.searches_per_move, 50);
    assert_eq!(config.selfplay.plies_before_greedy, 0);
    assert_eq!(config.evaluation.rounds, 100);
}

#[test]
fn test_partial_config() {
    let toml_content = r#"
[common]
env_id = "tictactoe"
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.common.env_id, "tictactoe");
    assert_eq!(config.common.log_level, "info"); // Default
    assert_eq!(config.selfplay.batch_size, 32); // Default
    assert!((config.mcts.dirichlet_alpha - 0.03).abs() < f64::EPSILON); // Default
}

#[test]
fn test_partial_section() {
    let toml_content = r#"
[mcts]
dirichlet_weight = 0.0
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.mcts.dirichlet_weight, 0.0);
    assert!((config.mcts.c_puct - 1.5).abs() < f64::EPSILON);
}

#[test]
fn test_load_from_path() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[selfplay]\nreplay_capacity = 123").unwrap();

    let config = load_from_path(file.path());
    assert_eq!(config.selfplay.replay_capacity, 123);
    assert_eq!(config.common.env_id, "caro7x7");
}

#[test]
fn test_load_from_invalid_file_uses_defaults() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "this is = = not toml").unwrap();

    let config = load_from_path(file.path());
    assert_eq!(config.selfplay.replay_capacity, 10_000);
}

#[test]
fn test_load_config_honors_config_path_env() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[actor]\nlog_interval = 3").unwrap();
    std::env::set_var(CONFIG_PATH_ENV, file.path());

    let config = load_config();
    assert_eq!(config.actor.log_interval, 3);

    std::env::remove_var(CONFIG_PATH_ENV);
}
