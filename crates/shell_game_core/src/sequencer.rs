//! The round sequencer.
//!
//! One [`RoundSequencer`] owns a whole game session: the position mapping,
//! the ball holder, the counters and the current phase. It never sleeps.
//! Every operation returns an optional [`Wakeup`] and whoever drives the
//! sequencer calls [`RoundSequencer::advance`] once that much time has
//! passed. Inputs that arrive in the wrong phase are ignored.

use crate::difficulty::{Difficulty, DifficultyProfile, Levels};
use crate::invariants::assert_invariants;
use crate::layout::{LayoutProvider, SlotLayout};
use crate::presentation::{Message, PresentationSink, SlotMark, Tone};
use crate::shuffle::{ShufflePlan, SwapStep};
use crate::types::{CUP_COUNT, CupId, Positions, Scoreboard, SlotIndex};
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info, instrument, trace};

/// Pause between hiding the ball and the first swap.
pub const SETTLE_DELAY: Duration = Duration::from_millis(220);

/// How long the ball stays revealed after a pick.
pub const REVEAL_DURATION: Duration = Duration::from_millis(900);

/// How long the celebration runs after a correct pick.
pub const CONFETTI_DURATION: Duration = Duration::from_millis(900);

/// Request to call [`RoundSequencer::advance`] after a delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wakeup(Duration);

impl Wakeup {
    /// Wake up after `delay`.
    pub fn after(delay: Duration) -> Self {
        Self(delay)
    }

    /// How long to wait.
    pub fn delay(self) -> Duration {
        self.0
    }
}

/// Externally visible phase of the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum RoundPhase {
    /// Waiting for a start request.
    Idle,
    /// Ball visible, or just hidden and about to shuffle.
    Peeking,
    /// Cups are being swapped.
    Shuffling,
    /// Waiting for the player's pick.
    AwaitingPick,
    /// Showing where the ball was.
    Revealing,
}

/// Result of an honored pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickOutcome {
    /// Slot the player picked.
    pub slot: SlotIndex,
    /// Cup that was sitting in that slot.
    pub picked: CupId,
    /// Cup hiding the ball.
    pub ball_holder: CupId,
    /// Whether the pick found the ball.
    pub correct: bool,
}

#[derive(Debug)]
enum Stage {
    Idle,
    Peeking,
    Settling,
    Shuffling(ShufflePlan),
    AwaitingPick,
    Revealing,
}

/// Owns one game session and steps it through its phases.
pub struct RoundSequencer<L, S, R> {
    layout_provider: L,
    sink: S,
    rng: R,
    levels: Levels,
    difficulty: Difficulty,
    profile: DifficultyProfile,
    positions: Positions,
    ball_holder: CupId,
    layout: SlotLayout,
    stage: Stage,
    scoreboard: Scoreboard,
    last_outcome: Option<PickOutcome>,
}

impl<L, S, R> RoundSequencer<L, S, R>
where
    L: LayoutProvider,
    S: PresentationSink,
    R: Rng,
{
    /// Creates an idle session and paints its initial state.
    #[instrument(skip_all)]
    pub fn new(layout_provider: L, sink: S, rng: R) -> Self {
        let levels = Levels::default();
        let difficulty = Difficulty::default();
        let layout = SlotLayout::measure(&layout_provider);
        let mut sequencer = Self {
            layout_provider,
            sink,
            rng,
            levels,
            difficulty,
            profile: levels.get(difficulty),
            positions: Positions::identity(),
            ball_holder: CupId::ALL[0],
            layout,
            stage: Stage::Idle,
            scoreboard: Scoreboard::new(),
            last_outcome: None,
        };
        sequencer.paint_idle();
        sequencer
    }

    /// Replaces the profile table.
    pub fn with_levels(mut self, levels: Levels) -> Self {
        self.levels = levels;
        self.set_difficulty(self.difficulty);
        self
    }

    /// Selects the starting difficulty.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.set_difficulty(difficulty);
        self
    }

    fn paint_idle(&mut self) {
        self.project();
        self.sink.set_token_visible(false);
        self.sink.set_picking_enabled(false);
        self.sink.set_message(Message::Prompt);
        self.sink.set_scoreboard(&self.scoreboard);
        self.sink
            .set_difficulty(self.difficulty, &self.levels.get(self.difficulty));
    }

    // ─────────────────────────────────────────────────────────────
    //  Inputs
    // ─────────────────────────────────────────────────────────────

    /// Starts a round with a uniformly random ball holder.
    ///
    /// Ignored unless idle.
    #[instrument(skip(self), fields(phase = %self.phase()))]
    pub fn start_round(&mut self) -> Option<Wakeup> {
        if !matches!(self.stage, Stage::Idle) {
            debug!("Start ignored, round in progress");
            return None;
        }
        let holder = CupId::ALL[self.rng.random_range(0..CUP_COUNT)];
        self.begin_round(holder)
    }

    /// Starts a round with the ball under `holder`.
    ///
    /// Ignored unless idle.
    #[instrument(skip(self), fields(phase = %self.phase()))]
    pub fn start_round_with_holder(&mut self, holder: CupId) -> Option<Wakeup> {
        if !matches!(self.stage, Stage::Idle) {
            debug!("Start ignored, round in progress");
            return None;
        }
        self.begin_round(holder)
    }

    /// Picks the cup in `slot`.
    ///
    /// Honored only while awaiting a pick; returns the reveal wakeup.
    #[instrument(skip(self), fields(phase = %self.phase()))]
    pub fn pick(&mut self, slot: SlotIndex) -> Option<Wakeup> {
        if !matches!(self.stage, Stage::AwaitingPick) {
            debug!("Pick ignored, not awaiting a pick");
            return None;
        }

        let picked = self.positions.cup_at(slot);
        let outcome = PickOutcome {
            slot,
            picked,
            ball_holder: self.ball_holder,
            correct: picked == self.ball_holder,
        };
        self.stage = Stage::Revealing;
        self.sink.set_picking_enabled(false);

        let reveal = self.positions.slot_of(self.ball_holder);
        self.sink.mark_slot(reveal, SlotMark::Revealed, true);
        self.project();
        self.sink.set_token_visible(true);

        if outcome.correct {
            self.sink.set_message(Message::Correct);
            self.sink.confetti(CONFETTI_DURATION);
            self.play_tone(Tone::SUCCESS);
        } else {
            self.sink.set_message(Message::Miss);
            self.play_tone(Tone::FAILURE);
        }

        self.scoreboard.record(outcome.correct);
        self.sink.set_scoreboard(&self.scoreboard);
        self.last_outcome = Some(outcome);

        info!(
            %slot,
            picked = %outcome.picked,
            ball_holder = %outcome.ball_holder,
            correct = outcome.correct,
            score = self.scoreboard.score(),
            rounds = self.scoreboard.rounds(),
            "Pick resolved"
        );
        Some(Wakeup::after(REVEAL_DURATION))
    }

    /// Zeroes the counters and restores the idle prompt.
    ///
    /// A running round keeps running.
    #[instrument(skip(self), fields(phase = %self.phase()))]
    pub fn reset_scores(&mut self) {
        self.scoreboard.reset();
        self.sink.set_scoreboard(&self.scoreboard);
        self.sink.set_message(Message::Prompt);
        info!("Scores reset");
    }

    /// Selects the difficulty for the next round.
    ///
    /// The round in progress keeps the profile it started with.
    #[instrument(skip(self))]
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        let profile = self.levels.get(difficulty);
        self.sink.set_difficulty(difficulty, &profile);
        debug!(speed_ms = profile.speed().as_millis() as u64, "Difficulty selected");
    }

    /// Re-measures slot centers and re-places cups and ball.
    ///
    /// Valid in any phase; touches nothing but coordinates.
    #[instrument(skip(self), fields(phase = %self.phase()))]
    pub fn relayout(&mut self) {
        self.layout = SlotLayout::measure(&self.layout_provider);
        self.project();
    }

    // ─────────────────────────────────────────────────────────────
    //  Timer
    // ─────────────────────────────────────────────────────────────

    /// Handles an expired wakeup and moves the round along.
    ///
    /// Returns the next wakeup, or `None` when the sequencer is waiting on
    /// input.
    #[instrument(skip(self), fields(phase = %self.phase()))]
    pub fn advance(&mut self) -> Option<Wakeup> {
        match self.stage {
            Stage::Idle | Stage::AwaitingPick => {
                debug!("Spurious wakeup ignored");
                None
            }
            Stage::Peeking => self.end_peek(),
            Stage::Settling => self.begin_shuffle(),
            Stage::Shuffling(_) => self.shuffle_step(),
            Stage::Revealing => self.end_reveal(),
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Phases
    // ─────────────────────────────────────────────────────────────

    fn begin_round(&mut self, holder: CupId) -> Option<Wakeup> {
        self.positions = Positions::identity();
        self.ball_holder = holder;
        self.profile = self.levels.get(self.difficulty);
        self.last_outcome = None;
        self.layout = SlotLayout::measure(&self.layout_provider);
        self.project();
        self.sink.set_difficulty(self.difficulty, &self.profile);

        let slot = self.positions.slot_of(holder);
        self.sink.set_token_visible(true);
        self.sink.mark_slot(slot, SlotMark::Peeking, true);
        self.sink.set_message(Message::Peeking);
        self.stage = Stage::Peeking;

        info!(
            difficulty = %self.difficulty,
            ball_holder = %holder,
            swaps = self.profile.swaps(),
            speed_ms = self.profile.speed().as_millis() as u64,
            "Round started"
        );
        Some(Wakeup::after(self.profile.peek()))
    }

    fn end_peek(&mut self) -> Option<Wakeup> {
        let slot = self.positions.slot_of(self.ball_holder);
        self.sink.mark_slot(slot, SlotMark::Peeking, false);
        self.sink.set_token_visible(false);
        self.stage = Stage::Settling;
        Some(Wakeup::after(SETTLE_DELAY))
    }

    fn begin_shuffle(&mut self) -> Option<Wakeup> {
        self.stage = Stage::Shuffling(ShufflePlan::new(
            self.profile.swaps(),
            self.profile.speed(),
        ));
        self.sink.set_picking_enabled(false);
        self.sink.set_message(Message::Shuffling);
        debug!("Shuffle started");
        self.shuffle_step()
    }

    fn shuffle_step(&mut self) -> Option<Wakeup> {
        let step = match &mut self.stage {
            Stage::Shuffling(plan) => plan.next_step(&mut self.rng),
            _ => None,
        };
        match step {
            Some(step) => {
                self.apply_swap(step);
                Some(Wakeup::after(step.delay))
            }
            None => {
                self.finish_shuffle();
                None
            }
        }
    }

    fn apply_swap(&mut self, step: SwapStep) {
        let holder = self.ball_holder;
        self.positions.swap(step.a, step.b);
        assert_invariants(&self.positions);
        debug_assert_eq!(holder, self.ball_holder);

        self.sink.flourish([step.a, step.b], step.flourish);
        self.project();
        trace!(
            a = %step.a,
            b = %step.b,
            delay_ms = step.delay.as_millis() as u64,
            cups = ?self.positions.cups(),
            "Cups swapped"
        );
    }

    fn finish_shuffle(&mut self) {
        self.stage = Stage::AwaitingPick;
        self.sink.set_picking_enabled(true);
        self.sink.set_message(Message::PickACup);
        debug!(cups = ?self.positions.cups(), "Shuffle finished");
    }

    fn end_reveal(&mut self) -> Option<Wakeup> {
        let slot = self.positions.slot_of(self.ball_holder);
        self.sink.mark_slot(slot, SlotMark::Revealed, false);
        self.sink.set_token_visible(false);
        self.stage = Stage::Idle;
        debug!("Round finished");
        None
    }

    // ─────────────────────────────────────────────────────────────
    //  Presentation helpers
    // ─────────────────────────────────────────────────────────────

    /// Places cups and ball from the mapping and the cached layout.
    fn project(&mut self) {
        if !self.layout.is_complete() {
            debug!(
                centers = self.layout.centers().len(),
                "Layout incomplete, skipping projection"
            );
            return;
        }
        self.sink.place_cups(&self.positions, &self.layout);
        self.sink
            .place_token(self.positions.slot_of(self.ball_holder), &self.layout);
    }

    fn play_tone(&mut self, tone: Tone) {
        if let Err(err) = self.sink.play_tone(tone) {
            debug!(error = %err, "Feedback tone failed, ignoring");
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Accessors
    // ─────────────────────────────────────────────────────────────

    /// Current phase.
    pub fn phase(&self) -> RoundPhase {
        match self.stage {
            Stage::Idle => RoundPhase::Idle,
            Stage::Peeking | Stage::Settling => RoundPhase::Peeking,
            Stage::Shuffling(_) => RoundPhase::Shuffling,
            Stage::AwaitingPick => RoundPhase::AwaitingPick,
            Stage::Revealing => RoundPhase::Revealing,
        }
    }

    /// Swaps done and planned, while shuffling.
    pub fn shuffle_progress(&self) -> Option<(u32, u32)> {
        match &self.stage {
            Stage::Shuffling(plan) => Some((plan.done(), plan.total())),
            _ => None,
        }
    }

    /// Current slot → cup mapping.
    pub fn positions(&self) -> &Positions {
        &self.positions
    }

    /// Cup hiding the ball this round.
    pub fn ball_holder(&self) -> CupId {
        self.ball_holder
    }

    /// Score and round counters.
    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// Difficulty the next round will use.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Profile of the current (or most recent) round.
    pub fn round_profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    /// Profile table.
    pub fn levels(&self) -> &Levels {
        &self.levels
    }

    /// Last measured slot centers.
    pub fn layout(&self) -> &SlotLayout {
        &self.layout
    }

    /// Outcome of the most recent pick this round.
    pub fn last_outcome(&self) -> Option<&PickOutcome> {
        self.last_outcome.as_ref()
    }

    /// The presentation sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The presentation sink, mutably.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// The layout provider.
    pub fn layout_provider(&self) -> &L {
        &self.layout_provider
    }

    /// The layout provider, mutably. Call [`Self::relayout`] afterwards.
    pub fn layout_provider_mut(&mut self) -> &mut L {
        &mut self.layout_provider
    }
}
