//! Core domain types: slots, cups, the position mapping and the scoreboard.

use crate::error::SlotError;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Number of cups (and slots) on the table.
pub const CUP_COUNT: usize = 3;

/// A fixed visual position on the table, numbered left to right from 0.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    derive_more::Display,
)]
#[display("slot {}", _0)]
pub struct SlotIndex(u8);

impl SlotIndex {
    /// All slots, left to right.
    pub const ALL: [SlotIndex; CUP_COUNT] = [SlotIndex(0), SlotIndex(1), SlotIndex(2)];

    /// Creates a slot index, rejecting anything outside `0..3`.
    #[track_caller]
    pub fn new(index: usize) -> Result<Self, SlotError> {
        if index < CUP_COUNT {
            Ok(Self(index as u8))
        } else {
            Err(SlotError::new(format!(
                "slot {} is out of range (0..{})",
                index, CUP_COUNT
            )))
        }
    }

    /// Parses a 1-based slot number as typed by a player ("1", "2", "3").
    #[track_caller]
    pub fn from_label(label: char) -> Result<Self, SlotError> {
        match label.to_digit(10) {
            Some(n @ 1..=3) => Self::new(n as usize - 1),
            _ => Err(SlotError::new(format!("'{}' is not a slot number", label))),
        }
    }

    /// Returns the zero-based index.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the 1-based label shown to players.
    pub fn label(self) -> usize {
        self.index() + 1
    }

    /// Slot to the left, wrapping around.
    pub fn left(self) -> Self {
        Self(((self.index() + CUP_COUNT - 1) % CUP_COUNT) as u8)
    }

    /// Slot to the right, wrapping around.
    pub fn right(self) -> Self {
        Self(((self.index() + 1) % CUP_COUNT) as u8)
    }
}

impl TryFrom<usize> for SlotIndex {
    type Error = SlotError;

    #[track_caller]
    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

/// Stable identity of a cup, independent of where it currently sits.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    derive_more::Display,
)]
#[display("cup {}", _0)]
pub struct CupId(u8);

impl CupId {
    /// All cups in id order.
    pub const ALL: [CupId; CUP_COUNT] = [CupId(0), CupId(1), CupId(2)];

    /// Creates a cup id, rejecting anything outside `0..3`.
    #[track_caller]
    pub fn new(id: usize) -> Result<Self, SlotError> {
        if id < CUP_COUNT {
            Ok(Self(id as u8))
        } else {
            Err(SlotError::new(format!(
                "cup {} is out of range (0..{})",
                id, CUP_COUNT
            )))
        }
    }

    /// Returns the zero-based id.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<usize> for CupId {
    type Error = SlotError;

    #[track_caller]
    fn try_from(id: usize) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

/// Which cup occupies which slot.
///
/// Holds the forward mapping (slot → cup) and its inverse (cup → slot).
/// Both are updated together by [`Positions::swap`], so the inverse lookup
/// never has to scan or re-derive anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Positions {
    cups: [CupId; CUP_COUNT],
    slots: [SlotIndex; CUP_COUNT],
}

impl Positions {
    /// Cup 0 in slot 0, cup 1 in slot 1, cup 2 in slot 2.
    pub fn identity() -> Self {
        Self {
            cups: CupId::ALL,
            slots: SlotIndex::ALL,
        }
    }

    /// Builds a mapping from an explicit slot → cup array.
    ///
    /// Fails unless every cup appears exactly once.
    #[instrument]
    pub fn from_cups(cups: [CupId; CUP_COUNT]) -> Result<Self, SlotError> {
        let mut slots = [None; CUP_COUNT];
        for (slot, cup) in SlotIndex::ALL.into_iter().zip(cups) {
            if slots[cup.index()].replace(slot).is_some() {
                return Err(SlotError::new(format!("{} appears more than once", cup)));
            }
        }
        let [Some(a), Some(b), Some(c)] = slots else {
            return Err(SlotError::new("mapping is not a permutation"));
        };
        Ok(Self {
            cups,
            slots: [a, b, c],
        })
    }

    /// Cup currently sitting in `slot`.
    pub fn cup_at(&self, slot: SlotIndex) -> CupId {
        self.cups[slot.index()]
    }

    /// Slot currently holding `cup`.
    pub fn slot_of(&self, cup: CupId) -> SlotIndex {
        self.slots[cup.index()]
    }

    /// Exchanges the cups in two slots.
    pub fn swap(&mut self, a: SlotIndex, b: SlotIndex) {
        self.cups.swap(a.index(), b.index());
        self.slots[self.cups[a.index()].index()] = a;
        self.slots[self.cups[b.index()].index()] = b;
    }

    /// Slot → cup array, left to right.
    pub fn cups(&self) -> &[CupId; CUP_COUNT] {
        &self.cups
    }

    /// Cup → slot array, in cup id order.
    pub fn slots(&self) -> &[SlotIndex; CUP_COUNT] {
        &self.slots
    }
}

impl Default for Positions {
    fn default() -> Self {
        Self::identity()
    }
}

/// Score and round counters. Both only ever go up, until reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    score: u32,
    rounds: u32,
}

impl Scoreboard {
    /// Creates a zeroed scoreboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of correct picks.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Number of honored picks.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Records one honored pick.
    pub fn record(&mut self, correct: bool) {
        self.rounds = self.rounds.saturating_add(1);
        if correct {
            self.score = self.score.saturating_add(1);
        }
    }

    /// Zeroes both counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cup(i: usize) -> CupId {
        CupId::new(i).unwrap()
    }

    fn slot(i: usize) -> SlotIndex {
        SlotIndex::new(i).unwrap()
    }

    #[test]
    fn test_slot_range_is_checked() {
        assert!(SlotIndex::new(2).is_ok());
        assert!(SlotIndex::new(3).is_err());
        assert!(CupId::try_from(7usize).is_err());
    }

    #[test]
    fn test_slot_labels_are_one_based() {
        assert_eq!(SlotIndex::from_label('1').unwrap(), slot(0));
        assert_eq!(SlotIndex::from_label('3').unwrap().label(), 3);
        assert!(SlotIndex::from_label('0').is_err());
        assert!(SlotIndex::from_label('x').is_err());
    }

    #[test]
    fn test_slot_neighbours_wrap() {
        assert_eq!(slot(0).left(), slot(2));
        assert_eq!(slot(2).right(), slot(0));
        assert_eq!(slot(1).right(), slot(2));
    }

    #[test]
    fn test_swap_keeps_inverse_in_sync() {
        let mut positions = Positions::identity();
        positions.swap(slot(0), slot(2));

        assert_eq!(positions.cups(), &[cup(2), cup(1), cup(0)]);
        assert_eq!(positions.slot_of(cup(2)), slot(0));
        assert_eq!(positions.slot_of(cup(0)), slot(2));
        assert_eq!(positions.slot_of(cup(1)), slot(1));

        positions.swap(slot(1), slot(0));
        for s in SlotIndex::ALL {
            assert_eq!(positions.slot_of(positions.cup_at(s)), s);
        }
    }

    #[test]
    fn test_from_cups_rejects_duplicates() {
        assert!(Positions::from_cups([cup(0), cup(0), cup(2)]).is_err());

        let positions = Positions::from_cups([cup(1), cup(2), cup(0)]).unwrap();
        assert_eq!(positions.slot_of(cup(0)), slot(2));
    }

    #[test]
    fn test_scoreboard_counts_rounds_and_hits() {
        let mut board = Scoreboard::new();
        board.record(true);
        board.record(false);
        board.record(true);
        assert_eq!(board.score(), 2);
        assert_eq!(board.rounds(), 3);

        board.reset();
        assert_eq!(board, Scoreboard::default());
    }
}
