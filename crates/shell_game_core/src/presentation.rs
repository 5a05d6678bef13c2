//! Presentation side of the game: the sink trait and what flows through it.

use crate::difficulty::{Difficulty, DifficultyProfile};
use crate::error::SinkError;
use crate::layout::SlotLayout;
use crate::types::{Positions, Scoreboard, SlotIndex};
use std::time::Duration;

/// A feedback beep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tone {
    /// Pitch in hertz.
    pub frequency_hz: u32,
    /// How long the tone plays.
    pub duration: Duration,
}

impl Tone {
    /// High, short beep for a correct pick.
    pub const SUCCESS: Tone = Tone {
        frequency_hz: 880,
        duration: Duration::from_millis(60),
    };

    /// Low, longer beep for a miss.
    pub const FAILURE: Tone = Tone {
        frequency_hz: 220,
        duration: Duration::from_millis(120),
    };
}

/// Per-slot highlight state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotMark {
    /// Cup lifted to show the ball before shuffling.
    Peeking,
    /// Cup lifted to show where the ball was after a pick.
    Revealed,
}

/// Status line shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Message {
    /// Idle prompt.
    #[display("Press Start to begin")]
    Prompt,
    /// Ball is visible.
    #[display("Peeking...")]
    Peeking,
    /// Cups are moving.
    #[display("Shuffling...")]
    Shuffling,
    /// Waiting for a pick.
    #[display("Pick a cup!")]
    PickACup,
    /// Pick found the ball.
    #[display("Correct! You found it!")]
    Correct,
    /// Pick missed the ball.
    #[display("Not this one. Try next round.")]
    Miss,
}

/// Everything the sequencer asks the outside world to show or play.
///
/// Implementations must not fail the game: visual calls are infallible and
/// [`PresentationSink::play_tone`] errors are logged and discarded by the
/// caller.
pub trait PresentationSink {
    /// Places every cup centered on the slot `positions` assigns it.
    fn place_cups(&mut self, positions: &Positions, layout: &SlotLayout);

    /// Places the ball under `slot`.
    fn place_token(&mut self, slot: SlotIndex, layout: &SlotLayout);

    /// Shows or hides the ball.
    fn set_token_visible(&mut self, visible: bool);

    /// Sets or clears a highlight on `slot`.
    fn mark_slot(&mut self, slot: SlotIndex, mark: SlotMark, on: bool);

    /// Briefly highlights the cups in two slots that were just swapped.
    fn flourish(&mut self, slots: [SlotIndex; 2], duration: Duration);

    /// Celebration effect for a correct pick.
    fn confetti(&mut self, duration: Duration);

    /// Plays a feedback tone.
    fn play_tone(&mut self, tone: Tone) -> Result<(), SinkError>;

    /// Enables or disables pick input.
    fn set_picking_enabled(&mut self, enabled: bool);

    /// Updates the status line.
    fn set_message(&mut self, message: Message);

    /// Updates the score and round counters.
    fn set_scoreboard(&mut self, scoreboard: &Scoreboard);

    /// Updates the selected difficulty and its speed readout.
    fn set_difficulty(&mut self, _difficulty: Difficulty, _profile: &DifficultyProfile) {}
}
