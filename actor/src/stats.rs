//! Self-play run statistics.
//!
//! Tracks game counts and outcomes plus the search counters summed over
//! every move, and logs a timing breakdown on request.

use std::time::Instant;

use engine_core::Player;
use mcts::SearchStats;
use tracing::info;

use crate::selfplay::GameOutcome;

/// Aggregated statistics for one actor run.
#[derive(Debug, Clone)]
pub struct RunStats {
    pub games_completed: u32,
    pub games_failed: u32,
    pub total_plies: u64,
    pub white_wins: u32,
    pub black_wins: u32,
    pub draws: u32,
    pub search: SearchStats,
    start_time: Instant,
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStats {
    pub fn new() -> Self {
        Self {
            games_completed: 0,
            games_failed: 0,
            total_plies: 0,
            white_wins: 0,
            black_wins: 0,
            draws: 0,
            search: SearchStats::default(),
            start_time: Instant::now(),
        }
    }

    pub fn record(&mut self, outcome: &GameOutcome) {
        self.games_completed += 1;
        self.total_plies += outcome.plies as u64;
        match outcome.winner {
            Some(Player::White) => self.white_wins += 1,
            Some(Player::Black) => self.black_wins += 1,
            None => self.draws += 1,
        }
        self.search += outcome.stats;
    }

    pub fn record_failure(&mut self) {
        self.games_failed += 1;
    }

    pub fn avg_plies(&self) -> f64 {
        if self.games_completed == 0 {
            return 0.0;
        }
        self.total_plies as f64 / self.games_completed as f64
    }

    pub fn games_per_second(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.games_completed as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Average number of new leaves per oracle call.
    pub fn avg_batch_fill(&self) -> f64 {
        if self.search.oracle_batches == 0 {
            return 0.0;
        }
        self.search.oracle_evaluations as f64 / self.search.oracle_batches as f64
    }

    /// Log outcome counts and the search timing breakdown.
    pub fn log_summary(&self) {
        info!(
            games = self.games_completed,
            failed = self.games_failed,
            white_wins = self.white_wins,
            black_wins = self.black_wins,
            draws = self.draws,
            avg_plies = format!("{:.1}", self.avg_plies()),
            games_per_sec = format!("{:.2}", self.games_per_second()),
            "Self-play progress"
        );

        let s = &self.search;
        let total_us = s.selection_us + s.inference_us + s.expansion_us + s.backup_us;
        if s.descents == 0 || total_us == 0 {
            return;
        }
        let pct = |us: u64| format!("{:.1}%", us as f64 / total_us as f64 * 100.0);
        info!(
            descents = s.descents,
            total_ms = format!("{:.1}", total_us as f64 / 1000.0),
            selection_pct = pct(s.selection_us),
            inference_pct = pct(s.inference_us),
            expansion_pct = pct(s.expansion_us),
            backup_pct = pct(s.backup_us),
            oracle_batches = s.oracle_batches,
            avg_batch_fill = format!("{:.1}", self.avg_batch_fill()),
            deduplicated = s.deduplicated_leaves,
            terminal_hits = s.terminal_hits,
            "Search stats"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(winner: Option<Player>, plies: u32) -> GameOutcome {
        GameOutcome {
            result_for_a: match winner {
                Some(Player::White) => 1.0,
                Some(Player::Black) => -1.0,
                None => 0.0,
            },
            plies,
            winner,
            stats: SearchStats {
                descents: 10,
                oracle_batches: 2,
                oracle_evaluations: 6,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_record_outcomes() {
        let mut stats = RunStats::new();
        stats.record(&outcome(Some(Player::White), 5));
        stats.record(&outcome(Some(Player::Black), 6));
        stats.record(&outcome(None, 9));
        stats.record_failure();

        assert_eq!(stats.games_completed, 3);
        assert_eq!(stats.games_failed, 1);
        assert_eq!(stats.white_wins, 1);
        assert_eq!(stats.black_wins, 1);
        assert_eq!(stats.draws, 1);
        assert_eq!(stats.total_plies, 20);
        assert_eq!(stats.search.descents, 30);
    }

    #[test]
    fn test_averages() {
        let mut stats = RunStats::new();
        assert_eq!(stats.avg_plies(), 0.0);
        assert_eq!(stats.avg_batch_fill(), 0.0);

        stats.record(&outcome(None, 4));
        stats.record(&outcome(None, 8));
        assert_eq!(stats.avg_plies(), 6.0);
        assert_eq!(stats.avg_batch_fill(), 3.0);
    }

    #[test]
    fn test_log_summary_without_games() {
        // Nothing recorded yet; must not divide by zero.
        RunStats::new().log_summary();
    }
}
