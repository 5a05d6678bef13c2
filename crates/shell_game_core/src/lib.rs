//! Shell game core - cups, positions and the round sequencer
//!
//! Pure game logic with no I/O. The sequencer talks to the outside world
//! only through two traits:
//!
//! - [`LayoutProvider`] reports where the three slots are drawn
//! - [`PresentationSink`] shows cups, ball, highlights, messages and tones
//!
//! Time is handled by the caller: every operation returns an optional
//! [`Wakeup`] and the caller invokes [`RoundSequencer::advance`] when it
//! fires.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use shell_game_core::{EvenLayout, RecordingSink, RoundPhase, RoundSequencer};
//!
//! let mut game = RoundSequencer::new(
//!     EvenLayout::new(90.0),
//!     RecordingSink::new(),
//!     StdRng::seed_from_u64(7),
//! );
//! game.start_round();
//! while game.advance().is_some() {}
//! assert_eq!(game.phase(), RoundPhase::AwaitingPick);
//!
//! let slot = game.positions().slot_of(game.ball_holder());
//! game.pick(slot);
//! assert_eq!(game.scoreboard().score(), 1);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod difficulty;
mod error;
mod invariants;
mod layout;
mod presentation;
mod recording;
mod sequencer;
mod shuffle;
mod types;

// Crate-level exports - Domain types
pub use types::{CUP_COUNT, CupId, Positions, Scoreboard, SlotIndex};

// Crate-level exports - Difficulty
pub use difficulty::{DEFAULT_PEEK, Difficulty, DifficultyProfile, Levels};

// Crate-level exports - Errors
pub use error::{SinkError, SlotError};

// Crate-level exports - Collaborators
pub use layout::{EvenLayout, LayoutProvider, SlotLayout};
pub use presentation::{Message, PresentationSink, SlotMark, Tone};
pub use recording::{RecordingSink, SinkEvent};

// Crate-level exports - Shuffle
pub use shuffle::{
    MAX_FLOURISH, MIN_STEP_DELAY, ShufflePlan, Steps, SwapStep, flourish_duration,
    pick_distinct_pair, step_delay,
};

// Crate-level exports - Sequencer
pub use sequencer::{
    CONFETTI_DURATION, PickOutcome, REVEAL_DURATION, RoundPhase, RoundSequencer, SETTLE_DELAY,
    Wakeup,
};

// Crate-level exports - Invariants
pub use invariants::{
    InverseConsistentInvariant, Invariant, InvariantSet, InvariantViolation, PermutationInvariant,
    PositionInvariants, assert_invariants,
};
