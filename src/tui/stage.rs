//! Render state for the terminal front end.
//!
//! [`TerminalStage`] is the presentation sink the sequencer writes into.
//! It keeps just enough state for [`super::ui::draw`] to paint a frame.

use shell_game_core::{
    CUP_COUNT, CupId, Difficulty, DifficultyProfile, Message, Positions, PresentationSink,
    Scoreboard, SinkError, SlotIndex, SlotLayout, SlotMark, Tone,
};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, trace};

/// A cup moving between two columns.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Slide {
    from: f32,
    start: Instant,
    until: Instant,
}

/// Visual state of the table plus the pick cursor.
#[derive(Debug, Clone)]
pub struct TerminalStage {
    slot_x: [Option<f32>; CUP_COUNT],
    cup_x: [Option<f32>; CUP_COUNT],
    cup_slot: [SlotIndex; CUP_COUNT],
    slides: [Option<Slide>; CUP_COUNT],
    token_x: Option<f32>,
    token_visible: bool,
    peeking: [bool; CUP_COUNT],
    revealed: [bool; CUP_COUNT],
    flourish_until: [Option<Instant>; CUP_COUNT],
    confetti_until: Option<Instant>,
    picking_enabled: bool,
    message: Message,
    scoreboard: Scoreboard,
    difficulty: Difficulty,
    speed: Duration,
    cursor: SlotIndex,
    mute: bool,
    bell_pending: bool,
}

impl TerminalStage {
    /// Creates an empty stage. `mute` silences the bell.
    pub fn new(mute: bool) -> Self {
        Self {
            slot_x: [None; CUP_COUNT],
            cup_x: [None; CUP_COUNT],
            cup_slot: SlotIndex::ALL,
            slides: [None; CUP_COUNT],
            token_x: None,
            token_visible: false,
            peeking: [false; CUP_COUNT],
            revealed: [false; CUP_COUNT],
            flourish_until: [None; CUP_COUNT],
            confetti_until: None,
            picking_enabled: false,
            message: Message::Prompt,
            scoreboard: Scoreboard::new(),
            difficulty: Difficulty::default(),
            speed: Difficulty::default().profile().speed(),
            cursor: SlotIndex::ALL[1],
            mute,
            bell_pending: false,
        }
    }

    /// Horizontal center of `cup` at `now`, part way along any slide.
    pub fn cup_x(&self, cup: CupId, now: Instant) -> Option<f32> {
        let target = self.cup_x[cup.index()]?;
        match self.slides[cup.index()] {
            Some(slide) if now < slide.until => {
                let total = slide.until.duration_since(slide.start).as_secs_f32();
                let t = if total > 0.0 {
                    (now.saturating_duration_since(slide.start).as_secs_f32() / total).min(1.0)
                } else {
                    1.0
                };
                Some(slide.from + (target - slide.from) * t)
            }
            _ => Some(target),
        }
    }

    /// Slot `cup` was last placed on.
    pub fn cup_slot(&self, cup: CupId) -> SlotIndex {
        self.cup_slot[cup.index()]
    }

    /// Whether a tone was requested since the last call. The caller rings
    /// the bell through the terminal it owns.
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell_pending)
    }

    /// Horizontal center of the cup drawn in `slot`.
    pub fn slot_x(&self, slot: SlotIndex) -> Option<f32> {
        self.slot_x[slot.index()]
    }

    /// Horizontal position of the ball, when it should be drawn.
    pub fn visible_token_x(&self) -> Option<f32> {
        self.token_x.filter(|_| self.token_visible)
    }

    /// Whether the cup in `slot` is lifted.
    pub fn is_lifted(&self, slot: SlotIndex) -> bool {
        self.peeking[slot.index()] || self.revealed[slot.index()]
    }

    /// Whether the cup in `slot` is lifted to reveal the ball after a pick.
    pub fn is_revealed(&self, slot: SlotIndex) -> bool {
        self.revealed[slot.index()]
    }

    /// Whether the cup in `slot` was swapped recently enough to highlight.
    pub fn is_flourishing(&self, slot: SlotIndex, now: Instant) -> bool {
        self.flourish_until[slot.index()].is_some_and(|until| now < until)
    }

    /// Whether the celebration banner is showing.
    pub fn is_celebrating(&self, now: Instant) -> bool {
        self.confetti_until.is_some_and(|until| now < until)
    }

    /// Whether picks are accepted right now.
    pub fn picking_enabled(&self) -> bool {
        self.picking_enabled
    }

    /// Status line.
    pub fn message(&self) -> Message {
        self.message
    }

    /// Counters as last reported.
    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// Selected difficulty.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Base swap speed of the selected difficulty.
    pub fn speed(&self) -> Duration {
        self.speed
    }

    /// Slot under the keyboard cursor.
    pub fn cursor(&self) -> SlotIndex {
        self.cursor
    }

    /// Moves the cursor one slot left, wrapping.
    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.left();
    }

    /// Moves the cursor one slot right, wrapping.
    pub fn cursor_right(&mut self) {
        self.cursor = self.cursor.right();
    }
}

impl PresentationSink for TerminalStage {
    fn place_cups(&mut self, positions: &Positions, layout: &SlotLayout) {
        let now = Instant::now();
        for slot in SlotIndex::ALL {
            self.slot_x[slot.index()] = layout.center(slot);
        }
        for cup in CupId::ALL {
            let slot = positions.slot_of(cup);
            let target = layout.center(slot);
            // Cups slide only while their new slot is flourishing; relayout jumps.
            let slide = match (
                self.cup_x(cup, now),
                target,
                self.flourish_until[slot.index()],
            ) {
                (Some(from), Some(to), Some(until)) if from != to && now < until => Some(Slide {
                    from,
                    start: now,
                    until,
                }),
                _ => None,
            };
            self.slides[cup.index()] = slide;
            self.cup_x[cup.index()] = target;
            self.cup_slot[cup.index()] = slot;
        }
    }

    fn place_token(&mut self, slot: SlotIndex, layout: &SlotLayout) {
        self.token_x = layout.center(slot);
    }

    fn set_token_visible(&mut self, visible: bool) {
        self.token_visible = visible;
    }

    fn mark_slot(&mut self, slot: SlotIndex, mark: SlotMark, on: bool) {
        match mark {
            SlotMark::Peeking => self.peeking[slot.index()] = on,
            SlotMark::Revealed => self.revealed[slot.index()] = on,
        }
    }

    fn flourish(&mut self, slots: [SlotIndex; 2], duration: Duration) {
        let until = Instant::now() + duration;
        for slot in slots {
            self.flourish_until[slot.index()] = Some(until);
        }
    }

    fn confetti(&mut self, duration: Duration) {
        self.confetti_until = Some(Instant::now() + duration);
    }

    fn play_tone(&mut self, tone: Tone) -> Result<(), SinkError> {
        if self.mute {
            trace!(frequency_hz = tone.frequency_hz, "Bell muted");
            return Ok(());
        }
        // Terminals have no pitch control; the bell stands in for both tones.
        self.bell_pending = true;
        debug!(frequency_hz = tone.frequency_hz, "Bell queued");
        Ok(())
    }

    fn set_picking_enabled(&mut self, enabled: bool) {
        self.picking_enabled = enabled;
    }

    fn set_message(&mut self, message: Message) {
        self.message = message;
    }

    fn set_scoreboard(&mut self, scoreboard: &Scoreboard) {
        self.scoreboard = *scoreboard;
    }

    fn set_difficulty(&mut self, difficulty: Difficulty, profile: &DifficultyProfile) {
        self.difficulty = difficulty;
        self.speed = profile.speed();
    }
}
