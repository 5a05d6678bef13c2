//! Shell Game - find the ball under three shuffled cups
//!
//! The round logic lives in [`shell_game_core`]; this crate wraps it in
//! front ends.
//!
//! # Architecture
//!
//! - **Config**: TOML settings with per-level overrides
//! - **Driver**: tokio timer loop that paces a round sequencer
//! - **Simulate**: headless rounds with an automatic picker
//! - **TUI**: ratatui front end
//!
//! # Example
//!
//! ```no_run
//! use shell_game::{GameConfig, PickStrategy, SimulationOptions, run_simulation};
//!
//! # async fn example() {
//! let config = GameConfig::default().with_seed(Some(7));
//! let summary = run_simulation(SimulationOptions::new(config, 10, PickStrategy::Tracker, false)).await;
//! println!("{summary}");
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod driver;
pub mod simulate;
pub mod tui;

// Crate-level exports - Configuration
pub use config::{ConfigError, GameConfig, LevelOverride, LevelOverrides};

// Crate-level exports - Driver
pub use driver::{Command, Driver, Timer};

// Crate-level exports - Simulation
pub use simulate::{
    LoggingSink, PickStrategy, SimulationOptions, SimulationSummary, run_simulation,
};

// Crate-level exports - Terminal front end
pub use tui::{TerminalStage, run_tui};

// Crate-level exports - Core game types
pub use shell_game_core::{Difficulty, RoundPhase, RoundSequencer, Scoreboard, SlotIndex};
