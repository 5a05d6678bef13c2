//! First-class invariants over the position mapping.
//!
//! Checked after every swap in debug builds, and testable on their own.

use crate::types::{CupId, Positions, SlotIndex};

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("Invariant violated: {}", description)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }

        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Invariant: every cup occupies exactly one slot.
pub struct PermutationInvariant;

impl Invariant<Positions> for PermutationInvariant {
    fn holds(positions: &Positions) -> bool {
        let mut seen = [false; 3];
        for cup in positions.cups() {
            if std::mem::replace(&mut seen[cup.index()], true) {
                return false;
            }
        }
        seen.iter().all(|s| *s)
    }

    fn description() -> &'static str {
        "Slot to cup mapping is a permutation of {0, 1, 2}"
    }
}

/// Invariant: the cup → slot lookup agrees with the slot → cup mapping.
pub struct InverseConsistentInvariant;

impl Invariant<Positions> for InverseConsistentInvariant {
    fn holds(positions: &Positions) -> bool {
        SlotIndex::ALL
            .into_iter()
            .all(|slot| positions.slot_of(positions.cup_at(slot)) == slot)
            && CupId::ALL
                .into_iter()
                .all(|cup| positions.cup_at(positions.slot_of(cup)) == cup)
    }

    fn description() -> &'static str {
        "Cup to slot lookup is the inverse of the slot to cup mapping"
    }
}

/// All position invariants as a composable set.
pub type PositionInvariants = (PermutationInvariant, InverseConsistentInvariant);

/// Panics in debug builds if any position invariant is violated.
pub fn assert_invariants(positions: &Positions) {
    #[cfg(debug_assertions)]
    if let Err(violations) = PositionInvariants::check_all(positions) {
        panic!("Position invariants violated: {:?}", violations);
    }
    #[cfg(not(debug_assertions))]
    let _ = positions;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_identity_holds() {
        assert!(PositionInvariants::check_all(&Positions::identity()).is_ok());
    }

    #[test]
    fn test_holds_through_random_swaps() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut positions = Positions::identity();
        for _ in 0..200 {
            let (a, b) = crate::shuffle::pick_distinct_pair(&mut rng);
            positions.swap(a, b);
            assert!(PositionInvariants::check_all(&positions).is_ok());
        }
    }

    #[test]
    fn test_violation_describes_itself() {
        let violation = InvariantViolation::new(PermutationInvariant::description());
        assert!(violation.to_string().contains("permutation"));
    }
}
