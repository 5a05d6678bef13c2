//! A presentation sink that remembers what it was told.
//!
//! Used by tests and by headless runs that want to inspect the visual state
//! without a renderer.

use crate::difficulty::{Difficulty, DifficultyProfile};
use crate::error::SinkError;
use crate::layout::SlotLayout;
use crate::presentation::{Message, PresentationSink, SlotMark, Tone};
use crate::types::{Positions, Scoreboard, SlotIndex};
use std::collections::HashSet;
use std::time::Duration;

/// One call made on a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    /// Cups were placed.
    CupsPlaced {
        /// Mapping at the time of the call.
        positions: Positions,
        /// Slot centers used.
        centers: Vec<f32>,
    },
    /// Ball was placed under a slot.
    TokenPlaced(SlotIndex),
    /// Ball visibility changed.
    TokenVisible(bool),
    /// Slot highlight changed.
    Marked(SlotIndex, SlotMark, bool),
    /// Swapped cups were highlighted.
    Flourish([SlotIndex; 2], Duration),
    /// Confetti fired.
    Confetti(Duration),
    /// Tone requested.
    Tone(Tone),
    /// Pick input toggled.
    Picking(bool),
    /// Status line changed.
    Message(Message),
    /// Counters changed.
    Scoreboard(Scoreboard),
    /// Difficulty readout changed.
    Difficulty(Difficulty),
}

/// Records every sink call and tracks the resulting visual state.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Vec<SinkEvent>,
    token_slot: Option<SlotIndex>,
    token_visible: bool,
    marks: HashSet<(SlotIndex, SlotMark)>,
    picking_enabled: bool,
    message: Option<Message>,
    fail_tones: bool,
}

impl RecordingSink {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every [`PresentationSink::play_tone`] call fail, as when no
    /// audio device is available.
    pub fn failing_tones(mut self) -> Self {
        self.fail_tones = true;
        self
    }

    /// All recorded calls, oldest first.
    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    /// Forgets recorded calls but keeps the tracked visual state.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Slot the ball was last placed under.
    pub fn token_slot(&self) -> Option<SlotIndex> {
        self.token_slot
    }

    /// Whether the ball is currently shown.
    pub fn token_visible(&self) -> bool {
        self.token_visible
    }

    /// Whether `slot` currently carries `mark`.
    pub fn is_marked(&self, slot: SlotIndex, mark: SlotMark) -> bool {
        self.marks.contains(&(slot, mark))
    }

    /// Whether pick input is enabled.
    pub fn picking_enabled(&self) -> bool {
        self.picking_enabled
    }

    /// Last status line.
    pub fn message(&self) -> Option<Message> {
        self.message
    }

    /// Tones requested so far.
    pub fn tones(&self) -> Vec<Tone> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Tone(tone) => Some(*tone),
                _ => None,
            })
            .collect()
    }

    /// Swap highlights requested so far.
    pub fn flourishes(&self) -> Vec<[SlotIndex; 2]> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Flourish(slots, _) => Some(*slots),
                _ => None,
            })
            .collect()
    }
}

impl PresentationSink for RecordingSink {
    fn place_cups(&mut self, positions: &Positions, layout: &SlotLayout) {
        self.events.push(SinkEvent::CupsPlaced {
            positions: positions.clone(),
            centers: layout.centers().to_vec(),
        });
    }

    fn place_token(&mut self, slot: SlotIndex, _layout: &SlotLayout) {
        self.token_slot = Some(slot);
        self.events.push(SinkEvent::TokenPlaced(slot));
    }

    fn set_token_visible(&mut self, visible: bool) {
        self.token_visible = visible;
        self.events.push(SinkEvent::TokenVisible(visible));
    }

    fn mark_slot(&mut self, slot: SlotIndex, mark: SlotMark, on: bool) {
        if on {
            self.marks.insert((slot, mark));
        } else {
            self.marks.remove(&(slot, mark));
        }
        self.events.push(SinkEvent::Marked(slot, mark, on));
    }

    fn flourish(&mut self, slots: [SlotIndex; 2], duration: Duration) {
        self.events.push(SinkEvent::Flourish(slots, duration));
    }

    fn confetti(&mut self, duration: Duration) {
        self.events.push(SinkEvent::Confetti(duration));
    }

    fn play_tone(&mut self, tone: Tone) -> Result<(), SinkError> {
        self.events.push(SinkEvent::Tone(tone));
        if self.fail_tones {
            return Err(SinkError::new("audio unavailable"));
        }
        Ok(())
    }

    fn set_picking_enabled(&mut self, enabled: bool) {
        self.picking_enabled = enabled;
        self.events.push(SinkEvent::Picking(enabled));
    }

    fn set_message(&mut self, message: Message) {
        self.message = Some(message);
        self.events.push(SinkEvent::Message(message));
    }

    fn set_scoreboard(&mut self, scoreboard: &Scoreboard) {
        self.events.push(SinkEvent::Scoreboard(*scoreboard));
    }

    fn set_difficulty(&mut self, difficulty: Difficulty, _profile: &DifficultyProfile) {
        self.events.push(SinkEvent::Difficulty(difficulty));
    }
}
