//! Slot coordinates reported by a layout provider.

use crate::types::{CUP_COUNT, SlotIndex};
use tracing::instrument;

/// Reports the center coordinate of every slot, left to right.
///
/// Coordinates are in whatever space the presentation sink places things in.
/// The sequencer asks again whenever the layout may have changed.
pub trait LayoutProvider {
    /// Current slot centers, one per rendered slot.
    fn slot_centers(&self) -> Vec<f32>;
}

/// Snapshot of slot centers taken from a [`LayoutProvider`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotLayout {
    centers: Vec<f32>,
}

impl SlotLayout {
    /// Queries `provider` for a fresh snapshot.
    #[instrument(skip(provider))]
    pub fn measure(provider: &impl LayoutProvider) -> Self {
        Self {
            centers: provider.slot_centers(),
        }
    }

    /// Center of `slot`, if the provider reported one.
    pub fn center(&self, slot: SlotIndex) -> Option<f32> {
        self.centers.get(slot.index()).copied()
    }

    /// All reported centers.
    pub fn centers(&self) -> &[f32] {
        &self.centers
    }

    /// Returns true when every slot has a center.
    pub fn is_complete(&self) -> bool {
        self.centers.len() >= CUP_COUNT
    }
}

/// Three slots spread evenly across a strip of the given width.
///
/// Each slot gets a third of the strip and sits in the middle of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvenLayout {
    origin: f32,
    width: f32,
}

impl EvenLayout {
    /// Creates a layout spanning `0..width`.
    pub fn new(width: f32) -> Self {
        Self { origin: 0.0, width }
    }

    /// Creates a layout spanning `origin..origin + width`.
    pub fn with_origin(origin: f32, width: f32) -> Self {
        Self { origin, width }
    }

    /// Changes the strip width, e.g. after a terminal resize.
    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    /// Current strip width.
    pub fn width(&self) -> f32 {
        self.width
    }
}

impl LayoutProvider for EvenLayout {
    fn slot_centers(&self) -> Vec<f32> {
        if self.width <= 0.0 {
            return Vec::new();
        }
        let cell = self.width / CUP_COUNT as f32;
        (0..CUP_COUNT)
            .map(|i| self.origin + cell * i as f32 + cell / 2.0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_layout_centers() {
        let layout = SlotLayout::measure(&EvenLayout::new(90.0));
        assert_eq!(layout.centers(), &[15.0, 45.0, 75.0]);
        assert!(layout.is_complete());
        assert_eq!(layout.center(SlotIndex::ALL[2]), Some(75.0));
    }

    #[test]
    fn test_origin_shifts_centers() {
        let layout = SlotLayout::measure(&EvenLayout::with_origin(10.0, 30.0));
        assert_eq!(layout.centers(), &[15.0, 25.0, 35.0]);
    }

    #[test]
    fn test_zero_width_reports_nothing() {
        let layout = SlotLayout::measure(&EvenLayout::new(0.0));
        assert!(!layout.is_complete());
        assert_eq!(layout.center(SlotIndex::ALL[0]), None);
    }
}
