//! Command-line interface for shell_game.

use clap::{Parser, Subcommand};
use shell_game::{Difficulty, PickStrategy};
use std::path::PathBuf;

/// Shell Game - keep your eye on the ball
#[derive(Parser, Debug)]
#[command(name = "shell_game")]
#[command(about = "Find the ball under three shuffled cups", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal
    Play {
        /// Starting difficulty (easy, medium, hard)
        #[arg(short, long)]
        difficulty: Option<Difficulty>,

        /// Path to a TOML config file
        #[arg(short, long, default_value = "shell_game.toml")]
        config: PathBuf,

        /// Seed for reproducible shuffles
        #[arg(long)]
        seed: Option<u64>,

        /// Silence the feedback bell
        #[arg(long)]
        mute: bool,
    },

    /// Play rounds headlessly and print the totals
    Simulate {
        /// Number of rounds
        #[arg(short, long, default_value = "100")]
        rounds: u32,

        /// Difficulty (easy, medium, hard)
        #[arg(short, long)]
        difficulty: Option<Difficulty>,

        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Path to a TOML config file
        #[arg(short, long, default_value = "shell_game.toml")]
        config: PathBuf,

        /// How the simulated player picks (random, tracker)
        #[arg(long, default_value_t = PickStrategy::Random)]
        picker: PickStrategy,

        /// Wait out real timers instead of skipping them
        #[arg(long)]
        realtime: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}
