//! Game configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use shell_game_core::{Difficulty, DifficultyProfile, Levels};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Settings for a play or simulation session.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct GameConfig {
    /// Difficulty selected at startup.
    #[serde(default)]
    difficulty: Difficulty,

    /// Seed for reproducible rounds. Entropy is used when absent.
    #[serde(default)]
    seed: Option<u64>,

    /// Suppress the feedback bell.
    #[serde(default)]
    mute: bool,

    /// Where the terminal front end writes its log.
    #[serde(default = "default_log_file")]
    log_file: PathBuf,

    /// Per-level overrides of the built-in profiles.
    #[serde(default)]
    levels: LevelOverrides,
}

fn default_log_file() -> PathBuf {
    PathBuf::from("shell_game.log")
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            seed: None,
            mute: false,
            log_file: default_log_file(),
            levels: LevelOverrides::default(),
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(difficulty = %config.difficulty, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns defaults.
    #[instrument(skip(path))]
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if path.exists() => Self::from_file(path),
            Some(path) => {
                info!(
                    "Config file not found at {}, using defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Built-in profiles with this config's overrides applied.
    pub fn resolved_levels(&self) -> Levels {
        self.levels.apply(Levels::default())
    }

    /// RNG seeded from `seed`, or from OS entropy.
    #[instrument(skip(self), fields(seed = ?self.seed))]
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// Independent RNG stream derived from `seed`, for consumers that must
    /// not share draws with the game itself.
    #[instrument(skip(self), fields(seed = ?self.seed))]
    pub fn rng_stream(&self, stream: u64) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ stream.wrapping_mul(STREAM_SALT)),
            None => StdRng::from_os_rng(),
        }
    }
}

/// Odd 64-bit constant used to spread stream numbers across the seed space.
const STREAM_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Optional replacement profiles, one per level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelOverrides {
    /// Override for easy.
    #[serde(default)]
    pub easy: Option<LevelOverride>,
    /// Override for medium.
    #[serde(default)]
    pub medium: Option<LevelOverride>,
    /// Override for hard.
    #[serde(default)]
    pub hard: Option<LevelOverride>,
}

impl LevelOverrides {
    /// Applies every present override on top of `levels`.
    pub fn apply(&self, mut levels: Levels) -> Levels {
        for (difficulty, level) in [
            (Difficulty::Easy, &self.easy),
            (Difficulty::Medium, &self.medium),
            (Difficulty::Hard, &self.hard),
        ] {
            if let Some(level) = level {
                levels.set(difficulty, level.apply(levels.get(difficulty)));
            }
        }
        levels
    }
}

/// Partial profile; missing fields keep the built-in value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelOverride {
    /// Number of swaps.
    pub swaps: Option<u32>,
    /// Base swap speed in milliseconds.
    pub speed_ms: Option<u64>,
    /// Peek duration in milliseconds.
    pub peek_ms: Option<u64>,
}

impl LevelOverride {
    /// Fills in whatever this override leaves out from `base`.
    pub fn apply(&self, base: DifficultyProfile) -> DifficultyProfile {
        DifficultyProfile::new(
            self.swaps.unwrap_or(base.swaps()),
            self.speed_ms.map(Duration::from_millis).unwrap_or(base.speed()),
            self.peek_ms.map(Duration::from_millis).unwrap_or(base.peek()),
        )
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
