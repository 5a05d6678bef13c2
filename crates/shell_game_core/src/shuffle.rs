//! Swap step generation.
//!
//! A [`ShufflePlan`] hands out one [`SwapStep`] at a time. The sequencer
//! pulls a step on every timer tick, so the shuffle is a plain loop driven
//! from outside rather than a chain of self-scheduling callbacks.

use crate::types::{CUP_COUNT, SlotIndex};
use rand::Rng;
use std::time::Duration;
use tracing::{instrument, trace};

/// Shortest allowed pause between two swaps.
pub const MIN_STEP_DELAY: Duration = Duration::from_millis(80);

/// Longest flourish shown on swapped cups.
pub const MAX_FLOURISH: Duration = Duration::from_millis(180);

/// The flourish ends this long before the next swap at base speed.
const FLOURISH_LEAD: Duration = Duration::from_millis(40);

/// Jitter spans ±1/8 of the base speed.
const JITTER_FRACTION: f64 = 0.125;

/// One swap of two distinct slots, plus its pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapStep {
    /// First slot.
    pub a: SlotIndex,
    /// Second slot, never equal to `a`.
    pub b: SlotIndex,
    /// How long the swapped cups stay highlighted.
    pub flourish: Duration,
    /// Pause before the next step.
    pub delay: Duration,
}

/// Picks two distinct slots uniformly at random.
///
/// The second slot is rejection-sampled until it differs from the first.
pub fn pick_distinct_pair<R: Rng + ?Sized>(rng: &mut R) -> (SlotIndex, SlotIndex) {
    let a = rng.random_range(0..CUP_COUNT);
    let mut b = rng.random_range(0..CUP_COUNT);
    while b == a {
        b = rng.random_range(0..CUP_COUNT);
    }
    (SlotIndex::ALL[a], SlotIndex::ALL[b])
}

/// Highlight duration for a swap at `speed`: `min(180ms, speed - 40ms)`.
pub fn flourish_duration(speed: Duration) -> Duration {
    MAX_FLOURISH.min(speed.saturating_sub(FLOURISH_LEAD))
}

/// Pause after a swap: `max(80ms, speed + jitter)`.
///
/// Jitter is uniform in `[-speed/8, +speed/8]`.
pub fn step_delay<R: Rng + ?Sized>(speed: Duration, rng: &mut R) -> Duration {
    let speed_ms = speed.as_millis() as f64;
    let spread = speed_ms * JITTER_FRACTION;
    let jitter = if spread > 0.0 {
        rng.random_range(-spread..=spread)
    } else {
        0.0
    };
    let delay_ms = (speed_ms + jitter).round().max(0.0) as u64;
    Duration::from_millis(delay_ms).max(MIN_STEP_DELAY)
}

/// A fixed number of swap steps at a given base speed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShufflePlan {
    total: u32,
    done: u32,
    speed: Duration,
}

impl ShufflePlan {
    /// Creates a plan for `swaps` swaps at base `speed`.
    #[instrument]
    pub fn new(swaps: u32, speed: Duration) -> Self {
        Self {
            total: swaps,
            done: 0,
            speed,
        }
    }

    /// Total number of swaps in the plan.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Swaps handed out so far.
    pub fn done(&self) -> u32 {
        self.done
    }

    /// Returns true once every swap has been handed out.
    pub fn is_finished(&self) -> bool {
        self.done >= self.total
    }

    /// Produces the next step, or `None` when the plan is exhausted.
    pub fn next_step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<SwapStep> {
        if self.is_finished() {
            return None;
        }
        let (a, b) = pick_distinct_pair(rng);
        let step = SwapStep {
            a,
            b,
            flourish: flourish_duration(self.speed),
            delay: step_delay(self.speed, rng),
        };
        self.done += 1;
        trace!(step = self.done, total = self.total, ?step, "Swap step planned");
        Some(step)
    }

    /// Iterates the remaining steps with a borrowed RNG.
    pub fn steps<'a, R: Rng + ?Sized>(&'a mut self, rng: &'a mut R) -> Steps<'a, R> {
        Steps { plan: self, rng }
    }
}

/// Iterator over the remaining steps of a [`ShufflePlan`].
pub struct Steps<'a, R: Rng + ?Sized> {
    plan: &'a mut ShufflePlan,
    rng: &'a mut R,
}

impl<R: Rng + ?Sized> Iterator for Steps<'_, R> {
    type Item = SwapStep;

    fn next(&mut self) -> Option<Self::Item> {
        self.plan.next_step(&mut *self.rng)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.plan.total.saturating_sub(self.plan.done) as usize;
        (left, Some(left))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_pairs_are_always_distinct() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let (a, b) = pick_distinct_pair(&mut rng);
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_every_pair_shows_up() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            let (a, b) = pick_distinct_pair(&mut rng);
            seen.insert((a.index().min(b.index()), a.index().max(b.index())));
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_flourish_is_capped_and_floored() {
        assert_eq!(flourish_duration(Duration::from_millis(700)), MAX_FLOURISH);
        assert_eq!(
            flourish_duration(Duration::from_millis(200)),
            Duration::from_millis(160)
        );
        assert_eq!(flourish_duration(Duration::from_millis(30)), Duration::ZERO);
    }

    #[test]
    fn test_step_delay_stays_within_jitter_band() {
        let mut rng = StdRng::seed_from_u64(3);
        let speed = Duration::from_millis(400);
        for _ in 0..1_000 {
            let delay = step_delay(speed, &mut rng);
            assert!(delay >= Duration::from_millis(350), "{:?}", delay);
            assert!(delay <= Duration::from_millis(450), "{:?}", delay);
        }
    }

    #[test]
    fn test_step_delay_has_a_floor() {
        let mut rng = StdRng::seed_from_u64(5);
        for speed_ms in [0, 10, 60, 85] {
            let delay = step_delay(Duration::from_millis(speed_ms), &mut rng);
            assert!(delay >= MIN_STEP_DELAY);
        }
    }

    #[test]
    fn test_plan_yields_exactly_total_steps() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut plan = ShufflePlan::new(8, Duration::from_millis(700));

        let steps: Vec<_> = plan.steps(&mut rng).collect();
        assert_eq!(steps.len(), 8);
        assert!(plan.is_finished());
        assert_eq!(plan.next_step(&mut rng), None);
    }

    #[test]
    fn test_empty_plan_is_finished() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut plan = ShufflePlan::new(0, Duration::from_millis(700));
        assert!(plan.is_finished());
        assert_eq!(plan.steps(&mut rng).size_hint(), (0, Some(0)));
        assert_eq!(plan.next_step(&mut rng), None);
    }
}
