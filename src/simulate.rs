//! Headless rounds with an automatic picker.

use crate::config::GameConfig;
use crate::driver::{Command, Driver};
use derive_new::new;
use rand::Rng;
use rand::rngs::StdRng;
use serde::Serialize;
use shell_game_core::{
    Difficulty, DifficultyProfile, EvenLayout, Message, Positions, PresentationSink,
    RoundSequencer, Scoreboard, SinkError, SlotIndex, SlotLayout, SlotMark, Tone,
};
use std::time::Duration;
use strum::{Display, EnumString};
use tracing::{debug, info, instrument, trace};

/// Width of the virtual table the simulator lays slots out on.
const TABLE_WIDTH: f32 = 300.0;

/// RNG stream for the simulated player's choices.
const PICKER_STREAM: u64 = 1;

/// How the simulated player chooses a cup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum PickStrategy {
    /// Uniformly random slot.
    #[default]
    Random,
    /// Follows the ball through every swap.
    Tracker,
}

/// What to simulate.
#[derive(Debug, Clone, new)]
pub struct SimulationOptions {
    /// Game settings.
    pub config: GameConfig,
    /// Number of rounds to play.
    pub rounds: u32,
    /// Picker behaviour.
    pub strategy: PickStrategy,
    /// Wait out real timers instead of skipping them.
    pub realtime: bool,
}

/// Totals after a simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSummary {
    /// Difficulty played.
    pub difficulty: Difficulty,
    /// Picker used.
    pub strategy: PickStrategy,
    /// Rounds played.
    pub rounds: u32,
    /// Correct picks.
    pub score: u32,
    /// Fraction of correct picks.
    pub hit_rate: f64,
    /// Swaps performed across all rounds.
    pub swaps: u64,
}

impl std::fmt::Display for SimulationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} rounds on {} ({} picker): {} correct, hit rate {:.1}%, {} swaps",
            self.rounds,
            self.difficulty,
            self.strategy,
            self.score,
            self.hit_rate * 100.0,
            self.swaps
        )
    }
}

/// Sink that turns every presentation call into a trace event.
#[derive(Debug, Default)]
pub struct LoggingSink {
    swaps: u64,
}

impl LoggingSink {
    /// Creates a sink with a zeroed swap counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap flourishes seen so far.
    pub fn swaps(&self) -> u64 {
        self.swaps
    }
}

impl PresentationSink for LoggingSink {
    fn place_cups(&mut self, positions: &Positions, layout: &SlotLayout) {
        trace!(cups = ?positions.cups(), centers = ?layout.centers(), "Cups placed");
    }

    fn place_token(&mut self, slot: SlotIndex, layout: &SlotLayout) {
        trace!(%slot, x = ?layout.center(slot), "Ball placed");
    }

    fn set_token_visible(&mut self, visible: bool) {
        trace!(visible, "Ball visibility");
    }

    fn mark_slot(&mut self, slot: SlotIndex, mark: SlotMark, on: bool) {
        trace!(%slot, ?mark, on, "Slot mark");
    }

    fn flourish(&mut self, slots: [SlotIndex; 2], duration: Duration) {
        self.swaps += 1;
        debug!(
            a = %slots[0],
            b = %slots[1],
            flourish_ms = duration.as_millis() as u64,
            "Swap"
        );
    }

    fn confetti(&mut self, duration: Duration) {
        debug!(duration_ms = duration.as_millis() as u64, "Confetti");
    }

    fn play_tone(&mut self, tone: Tone) -> Result<(), SinkError> {
        debug!(
            frequency_hz = tone.frequency_hz,
            duration_ms = tone.duration.as_millis() as u64,
            "Tone"
        );
        Ok(())
    }

    fn set_picking_enabled(&mut self, enabled: bool) {
        trace!(enabled, "Picking");
    }

    fn set_message(&mut self, message: Message) {
        debug!(%message, "Status");
    }

    fn set_scoreboard(&mut self, scoreboard: &Scoreboard) {
        trace!(
            score = scoreboard.score(),
            rounds = scoreboard.rounds(),
            "Scoreboard"
        );
    }

    fn set_difficulty(&mut self, difficulty: Difficulty, profile: &DifficultyProfile) {
        trace!(
            %difficulty,
            speed_ms = profile.speed().as_millis() as u64,
            "Difficulty"
        );
    }
}

type SimDriver = Driver<EvenLayout, LoggingSink, StdRng>;

/// Plays `options.rounds` rounds and reports the totals.
#[instrument(skip(options), fields(rounds = options.rounds, strategy = %options.strategy))]
pub async fn run_simulation(options: SimulationOptions) -> SimulationSummary {
    let config = &options.config;
    let mut picker_rng = config.rng_stream(PICKER_STREAM);
    let sequencer = RoundSequencer::new(
        EvenLayout::new(TABLE_WIDTH),
        LoggingSink::new(),
        config.rng(),
    )
    .with_levels(config.resolved_levels())
    .with_difficulty(*config.difficulty());
    let mut driver = Driver::new(sequencer);

    info!("Simulation started");
    for round in 1..=options.rounds {
        driver.handle(Command::Start);
        settle(&mut driver, options.realtime).await;

        let slot = choose_slot(&driver, options.strategy, &mut picker_rng);
        driver.handle(Command::Pick(slot));
        settle(&mut driver, options.realtime).await;

        debug!(
            round,
            score = driver.sequencer().scoreboard().score(),
            "Round complete"
        );
    }

    let scoreboard = *driver.sequencer().scoreboard();
    let summary = SimulationSummary {
        difficulty: driver.sequencer().difficulty(),
        strategy: options.strategy,
        rounds: scoreboard.rounds(),
        score: scoreboard.score(),
        hit_rate: if scoreboard.rounds() == 0 {
            0.0
        } else {
            f64::from(scoreboard.score()) / f64::from(scoreboard.rounds())
        },
        swaps: driver.sequencer().sink().swaps(),
    };
    info!(%summary, "Simulation finished");
    summary
}

async fn settle(driver: &mut SimDriver, realtime: bool) {
    if realtime {
        driver.run_until_input().await;
    } else {
        driver.fast_forward();
    }
}

fn choose_slot(driver: &SimDriver, strategy: PickStrategy, rng: &mut impl Rng) -> SlotIndex {
    let sequencer = driver.sequencer();
    match strategy {
        PickStrategy::Random => SlotIndex::ALL[rng.random_range(0..SlotIndex::ALL.len())],
        PickStrategy::Tracker => sequencer.positions().slot_of(sequencer.ball_holder()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(strategy: PickStrategy, rounds: u32) -> SimulationOptions {
        SimulationOptions::new(
            GameConfig::default().with_seed(Some(17)),
            rounds,
            strategy,
            false,
        )
    }

    #[tokio::test]
    async fn test_tracker_never_misses() {
        let summary = run_simulation(options(PickStrategy::Tracker, 20)).await;
        assert_eq!(summary.rounds, 20);
        assert_eq!(summary.score, 20);
        assert_eq!(summary.hit_rate, 1.0);
        assert_eq!(summary.swaps, 20 * 8);
    }

    #[tokio::test]
    async fn test_random_picker_counts_every_round() {
        let summary = run_simulation(options(PickStrategy::Random, 30)).await;
        assert_eq!(summary.rounds, 30);
        assert!(summary.score <= 30);
    }

    #[tokio::test]
    async fn test_seeded_runs_repeat() {
        let first = run_simulation(options(PickStrategy::Random, 10)).await;
        let second = run_simulation(options(PickStrategy::Random, 10)).await;
        assert_eq!(first, second);
    }

    #[tokio::test(start_paused = true)]
    async fn test_realtime_mode_waits_on_clock() {
        let mut opts = options(PickStrategy::Tracker, 1);
        opts.realtime = true;
        let start = tokio::time::Instant::now();
        let summary = run_simulation(opts).await;

        assert_eq!(summary.score, 1);
        // Peek alone takes three seconds.
        assert!(start.elapsed() >= Duration::from_millis(3000));
    }

    #[test]
    fn test_strategy_parses() {
        assert_eq!("tracker".parse::<PickStrategy>().unwrap(), PickStrategy::Tracker);
        assert!("psychic".parse::<PickStrategy>().is_err());
    }
}
