//! Self-play actor for the Caro game family.
//!
//! - [`selfplay`]: plays one game between two oracles and labels every move
//!   with the final outcome
//! - [`replay`]: bounded in-memory buffer the labelled samples land in
//! - [`arena`]: head-to-head evaluation with separate tree stores
//! - [`actor`]: the run loop behind the `actor` binary

pub mod actor;
pub mod arena;
pub mod config;
pub mod replay;
pub mod selfplay;
pub mod stats;

pub use arena::{evaluate, ArenaReport};
pub use config::Config;
pub use replay::{ReplayBuffer, ReplayError, ReplaySample, ReplaySink};
pub use selfplay::{play_game, GameOutcome, SelfPlayConfig, SelfPlayError, TreeStores};
pub use stats::RunStats;
