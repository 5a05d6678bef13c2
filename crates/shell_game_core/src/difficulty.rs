//! Difficulty levels and their timing profiles.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::instrument;

/// Selectable difficulty.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Few, slow swaps.
    #[default]
    Easy,
    /// More swaps, faster.
    Medium,
    /// Many quick swaps.
    Hard,
}

impl Difficulty {
    /// Built-in profile for this level.
    pub fn profile(self) -> DifficultyProfile {
        match self {
            Self::Easy => DifficultyProfile::new(8, Duration::from_millis(700), DEFAULT_PEEK),
            Self::Medium => DifficultyProfile::new(14, Duration::from_millis(420), DEFAULT_PEEK),
            Self::Hard => DifficultyProfile::new(24, Duration::from_millis(260), DEFAULT_PEEK),
        }
    }

    /// Next level, wrapping from hard back to easy.
    #[instrument]
    pub fn next(self) -> Self {
        Self::iter()
            .cycle()
            .skip_while(|level| *level != self)
            .nth(1)
            .unwrap_or_default()
    }
}

/// How long the ball stays visible before shuffling, for every built-in level.
pub const DEFAULT_PEEK: Duration = Duration::from_millis(3000);

/// Swap count, base swap speed and peek duration for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyProfile {
    swaps: u32,
    speed: Duration,
    peek: Duration,
}

impl DifficultyProfile {
    /// Creates a profile.
    pub fn new(swaps: u32, speed: Duration, peek: Duration) -> Self {
        Self { swaps, speed, peek }
    }

    /// Number of swaps per round.
    pub fn swaps(&self) -> u32 {
        self.swaps
    }

    /// Base delay between swaps.
    pub fn speed(&self) -> Duration {
        self.speed
    }

    /// How long the ball is shown before shuffling.
    pub fn peek(&self) -> Duration {
        self.peek
    }
}

/// Profile table for all levels.
///
/// Defaults to the built-in profiles; individual levels can be replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Levels {
    easy: DifficultyProfile,
    medium: DifficultyProfile,
    hard: DifficultyProfile,
}

impl Levels {
    /// Profile for `difficulty`.
    pub fn get(&self, difficulty: Difficulty) -> DifficultyProfile {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    /// Replaces the profile for `difficulty`.
    pub fn set(&mut self, difficulty: Difficulty, profile: DifficultyProfile) {
        match difficulty {
            Difficulty::Easy => self.easy = profile,
            Difficulty::Medium => self.medium = profile,
            Difficulty::Hard => self.hard = profile,
        }
    }
}

impl Default for Levels {
    fn default() -> Self {
        Self {
            easy: Difficulty::Easy.profile(),
            medium: Difficulty::Medium.profile(),
            hard: Difficulty::Hard.profile(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles() {
        let easy = Difficulty::Easy.profile();
        assert_eq!(easy.swaps(), 8);
        assert_eq!(easy.speed(), Duration::from_millis(700));

        let medium = Difficulty::Medium.profile();
        assert_eq!(medium.swaps(), 14);
        assert_eq!(medium.speed(), Duration::from_millis(420));

        let hard = Difficulty::Hard.profile();
        assert_eq!(hard.swaps(), 24);
        assert_eq!(hard.speed(), Duration::from_millis(260));
        assert_eq!(hard.peek(), Duration::from_millis(3000));
    }

    #[test]
    fn test_next_cycles_through_levels() {
        assert_eq!(Difficulty::Easy.next(), Difficulty::Medium);
        assert_eq!(Difficulty::Medium.next(), Difficulty::Hard);
        assert_eq!(Difficulty::Hard.next(), Difficulty::Easy);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!("Medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert!("brutal".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::Easy.to_string(), "easy");
    }

    #[test]
    fn test_levels_override_one_level() {
        let mut levels = Levels::default();
        let custom = DifficultyProfile::new(3, Duration::from_millis(100), Duration::ZERO);
        levels.set(Difficulty::Medium, custom);

        assert_eq!(levels.get(Difficulty::Medium), custom);
        assert_eq!(levels.get(Difficulty::Easy), Difficulty::Easy.profile());
    }
}
