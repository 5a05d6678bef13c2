//! Timer-driven loop around a [`RoundSequencer`].
//!
//! The sequencer hands back [`Wakeup`]s; the driver turns them into a single
//! cancellable deadline on the tokio clock and feeds player commands in.

use rand::Rng;
use shell_game_core::{
    Difficulty, LayoutProvider, PresentationSink, RoundPhase, RoundSequencer, SlotIndex, Wakeup,
};
use std::time::Duration;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, instrument, trace};

/// Player or window input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Begin a round.
    Start,
    /// Pick the cup in a slot.
    Pick(SlotIndex),
    /// Zero the counters.
    Reset,
    /// Slot geometry changed.
    Relayout,
    /// Select a difficulty for the next round.
    SetDifficulty(Difficulty),
    /// Select the next difficulty, wrapping around.
    CycleDifficulty,
}

/// A single pending deadline that can be re-armed or cancelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    deadline: Option<Instant>,
}

impl Timer {
    /// Creates a disarmed timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires `after` from now, replacing any pending deadline.
    pub fn arm(&mut self, after: Duration) {
        self.deadline = Some(Instant::now() + after);
    }

    /// Drops the pending deadline, if any.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// The pending deadline.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether a deadline is pending.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Whether the pending deadline has passed.
    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| deadline <= Instant::now())
    }
}

/// Resolves at `deadline`, or never when there is none.
pub async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Owns a sequencer and the timer that paces it.
pub struct Driver<L, S, R> {
    sequencer: RoundSequencer<L, S, R>,
    timer: Timer,
}

impl<L, S, R> Driver<L, S, R>
where
    L: LayoutProvider,
    S: PresentationSink,
    R: Rng,
{
    /// Wraps an idle sequencer.
    pub fn new(sequencer: RoundSequencer<L, S, R>) -> Self {
        Self {
            sequencer,
            timer: Timer::new(),
        }
    }

    /// Applies a command to the sequencer.
    ///
    /// Commands that start a timed phase arm the timer. Ignored commands
    /// leave the pending deadline alone.
    #[instrument(skip(self), fields(phase = %self.sequencer.phase()))]
    pub fn handle(&mut self, command: Command) {
        let wakeup = match command {
            Command::Start => self.sequencer.start_round(),
            Command::Pick(slot) => self.sequencer.pick(slot),
            Command::Reset => {
                self.sequencer.reset_scores();
                None
            }
            Command::Relayout => {
                self.sequencer.relayout();
                None
            }
            Command::SetDifficulty(difficulty) => {
                self.sequencer.set_difficulty(difficulty);
                None
            }
            Command::CycleDifficulty => {
                let next = self.sequencer.difficulty().next();
                self.sequencer.set_difficulty(next);
                None
            }
        };
        if let Some(wakeup) = wakeup {
            self.schedule(wakeup);
        }
    }

    /// Runs the sequencer's pending step. Call when the deadline passes.
    #[instrument(skip(self), fields(phase = %self.sequencer.phase()))]
    pub fn tick(&mut self) {
        self.timer.cancel();
        if let Some(wakeup) = self.sequencer.advance() {
            self.schedule(wakeup);
        }
    }

    /// Waits out every pending deadline until the sequencer needs input.
    #[instrument(skip(self))]
    pub async fn run_until_input(&mut self) {
        while self.timer.is_armed() {
            until(self.timer.deadline()).await;
            self.tick();
        }
        debug!(phase = %self.sequencer.phase(), "Waiting for input");
    }

    /// Like [`Self::run_until_input`], but without waiting.
    #[instrument(skip(self))]
    pub fn fast_forward(&mut self) {
        while self.timer.is_armed() {
            self.tick();
        }
    }

    fn schedule(&mut self, wakeup: Wakeup) {
        trace!(delay_ms = wakeup.delay().as_millis() as u64, "Timer armed");
        self.timer.arm(wakeup.delay());
    }

    /// Pending deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Whether the pending deadline has passed.
    pub fn is_due(&self) -> bool {
        self.timer.is_expired()
    }

    /// Current phase.
    pub fn phase(&self) -> RoundPhase {
        self.sequencer.phase()
    }

    /// The wrapped sequencer.
    pub fn sequencer(&self) -> &RoundSequencer<L, S, R> {
        &self.sequencer
    }

    /// The wrapped sequencer, mutably.
    pub fn sequencer_mut(&mut self) -> &mut RoundSequencer<L, S, R> {
        &mut self.sequencer
    }
}
