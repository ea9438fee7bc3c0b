//! Self-play run loop.
//!
//! Plays games back to back with one shared tree store, feeding every
//! finished game into the replay buffer. A failed game is logged and
//! dropped; the run continues with the next one.

use anyhow::{anyhow, Result};
use engine_core::{create_game, list_registered_games, Game};
use indicatif::{ProgressBar, ProgressStyle};
use mcts::{MctsTree, TreeStats, UniformOracle};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::arena::{self, ArenaReport};
use crate::config::Config;
use crate::replay::ReplayBuffer;
use crate::selfplay::{play_game, GameOutcome, SelfPlayConfig, SelfPlayError, TreeStores};
use crate::stats::RunStats;

pub struct Actor {
    config: Config,
    selfplay: SelfPlayConfig,
    game: Box<dyn Game>,
    oracle: UniformOracle,
    tree: MctsTree,
    replay: ReplayBuffer,
    rng: ChaCha20Rng,
}

impl Actor {
    /// Build an actor for `config.env_id`. Games must already be registered.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let game = create_game(&config.env_id).ok_or_else(|| {
            anyhow!(
                "Unknown game '{}', registered games: {:?}",
                config.env_id,
                list_registered_games()
            )
        })?;
        let action_space = game.action_space();
        let replay = ReplayBuffer::new(config.replay_capacity)?;
        let rng = match config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };

        info!(
            env_id = %game.env_id(),
            action_space,
            obs_shape = ?game.obs_shape(),
            seed = ?config.seed,
            "Actor initialized"
        );
        info!(
            "Search config: {} minibatches x {} descents per move, greedy after {} plies",
            config.searches_per_move, config.batch_size, config.plies_before_greedy
        );

        Ok(Self {
            selfplay: config.selfplay_config(),
            config,
            game,
            oracle: UniformOracle::new(action_space),
            tree: MctsTree::new(action_space),
            replay,
            rng,
        })
    }

    /// Play a single self-play game into the replay buffer.
    pub fn run_episode(&mut self) -> Result<GameOutcome, SelfPlayError> {
        play_game(
            &*self.game,
            TreeStores::Shared(&mut self.tree),
            Some(&mut self.replay),
            &self.oracle,
            &self.oracle,
            &self.selfplay,
            None,
            &mut self.rng,
        )
    }

    /// Run the configured number of episodes, then the optional arena.
    pub fn run(&mut self) -> Result<RunStats> {
        let episodes = self.config.episodes;
        let max_description = if self.config.unlimited() {
            "unlimited".to_string()
        } else {
            episodes.to_string()
        };
        info!(episodes, "Actor will run {} episodes", max_description);

        // Progress bar for bounded runs, only when stderr is a TTY
        let progress = if episodes > 0 && std::io::IsTerminal::is_terminal(&std::io::stderr()) {
            let pb = ProgressBar::new(episodes as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} episodes ({eta})")?
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        let mut stats = RunStats::new();
        let mut completed = 0u32;
        while self.config.unlimited() || (completed as i64) < episodes as i64 {
            let start = Instant::now();
            match self.run_episode() {
                Ok(outcome) => {
                    stats.record(&outcome);
                    debug!(
                        episode = completed + 1,
                        plies = outcome.plies,
                        winner = ?outcome.winner,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Episode complete"
                    );
                }
                Err(e) => {
                    stats.record_failure();
                    error!("Episode {} failed: {}", completed + 1, e);
                }
            }
            completed += 1;

            if let Some(ref pb) = progress {
                pb.inc(1);
            }

            if self.config.log_interval > 0 && completed % self.config.log_interval == 0 {
                let log = || {
                    let tree = self.tree_summary();
                    info!(
                        "Completed {} episodes (last: {:.2}s, tree nodes: {}, \
                         opening visits: {}, replay: {})",
                        completed,
                        start.elapsed().as_secs_f64(),
                        tree.total_nodes,
                        tree.root_visits,
                        self.replay.len()
                    );
                    stats.log_summary();
                };
                // Suspend progress bar while logging to avoid visual glitches
                match progress {
                    Some(ref pb) => pb.suspend(log),
                    None => log(),
                }
            }
        }

        if let Some(pb) = progress {
            pb.finish_with_message("done");
        }

        stats.log_summary();
        info!(
            games = stats.games_completed,
            failed = stats.games_failed,
            replay_samples = self.replay.len(),
            tree_nodes = self.tree.len(),
            "Self-play finished"
        );

        if self.config.eval_rounds > 0 {
            self.run_arena()?;
        }

        Ok(stats)
    }

    /// Self-arena sanity run: the current oracle against itself.
    ///
    /// Both sides are the same oracle, so the report is only logged. There is
    /// no challenger to promote and the self-play tree store is left alone.
    pub fn run_arena(&mut self) -> Result<ArenaReport> {
        let report = arena::evaluate(
            &*self.game,
            &self.oracle,
            &self.oracle,
            self.config.eval_rounds,
            &self.config.arena_config(),
            &mut self.rng,
        )?;

        if report.failed > 0 {
            warn!(failed = report.failed, "Some arena games failed");
        }
        info!(
            white_wins = report.challenger_wins,
            black_wins = report.champion_wins,
            draws = report.draws,
            white_win_ratio = report.win_ratio(),
            "Self-arena sanity report"
        );
        Ok(report)
    }

    pub fn replay(&self) -> &ReplayBuffer {
        &self.replay
    }

    pub fn tree(&self) -> &MctsTree {
        &self.tree
    }

    /// Node count and visits at the opening position.
    pub fn tree_summary(&self) -> TreeStats {
        self.tree.summary(&self.game.initial_state())
    }
}
