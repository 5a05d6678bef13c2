//! Shell Game - Unified CLI
//!
//! Terminal play and headless simulation.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use shell_game::{Difficulty, GameConfig, PickStrategy, SimulationOptions};
use std::path::Path;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            difficulty,
            config,
            seed,
            mute,
        } => {
            let config = load_config(&config, difficulty, seed)?;
            let config = if mute { config.with_mute(true) } else { config };
            shell_game::run_tui(config).await
        }
        Command::Simulate {
            rounds,
            difficulty,
            seed,
            config,
            picker,
            realtime,
            json,
        } => {
            let config = load_config(&config, difficulty, seed)?;
            run_simulate(config, rounds, picker, realtime, json).await
        }
    }
}

/// Reads the config file, then applies command-line overrides.
fn load_config(path: &Path, difficulty: Option<Difficulty>, seed: Option<u64>) -> Result<GameConfig> {
    let mut config = GameConfig::load_or_default(Some(path))?;
    if let Some(difficulty) = difficulty {
        config = config.with_difficulty(difficulty);
    }
    if seed.is_some() {
        config = config.with_seed(seed);
    }
    Ok(config)
}

/// Run headless rounds
#[instrument(skip(config))]
async fn run_simulate(
    config: GameConfig,
    rounds: u32,
    picker: PickStrategy,
    realtime: bool,
    json: bool,
) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,shell_game=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(difficulty = %config.difficulty(), seed = ?config.seed(), "Starting simulation");

    let summary =
        shell_game::run_simulation(SimulationOptions::new(config, rounds, picker, realtime)).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{summary}");
    }
    Ok(())
}
