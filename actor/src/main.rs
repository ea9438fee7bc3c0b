//! Actor - self-play runner for the Caro game family
//!
//! A batch process that:
//! 1. Registers the Caro variants and picks the one named by `--env-id`
//! 2. Plays self-play games with batched PUCT search over a shared tree store
//! 3. Collects labelled samples in a bounded in-memory replay buffer
//! 4. Optionally finishes with an arena run of the oracle against itself

use actor::actor::Actor;
use actor::Config;
use anyhow::Result;
use clap::Parser;
use engine_games::register_all_games;
use tracing::info;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    eprintln!("Actor starting...");

    // Parse configuration
    let config = Config::parse();
    eprintln!("Configuration parsed successfully");

    // Validate configuration
    config.validate()?;
    eprintln!("Configuration validated successfully");

    // Initialize tracing
    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    register_all_games();

    let mut actor = Actor::new(config)?;
    let stats = actor.run()?;

    info!(
        games = stats.games_completed,
        failed = stats.games_failed,
        "Actor shutdown complete"
    );
    Ok(())
}
