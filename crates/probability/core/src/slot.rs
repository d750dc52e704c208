//! Cumulative weight ranges.
//!
//! [`generate_slots`] walks entries in declaration order and assigns each a
//! closed range `[start, end]` with `end = start + weight`. Consecutive slots
//! are separated by a one-unit gap (`next.start = previous.end + 1`), so the
//! open interval `(end, end + 1)` between two slots matches no entry. That
//! gap is the *dead zone*.
//!
//! `max_random_value` is the sum of the weights, not the span of the slots
//! including gaps, so trailing slots may extend past the draw range.

use crate::entry::Entry;

/// Range assigned to one entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slot {
    pub start: u32,
    pub end: u32,
}

impl Slot {
    /// Number of units covered, equal to the entry weight.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.end - self.start
    }

    /// Zero-weight slots collapse to a point and never match a draw.
    #[inline]
    pub const fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, draw: f64) -> bool {
        !self.is_degenerate() && f64::from(self.start) <= draw && draw <= f64::from(self.end)
    }
}

/// Slots for a whole entry list, parallel to it by index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotTable {
    slots: Vec<Slot>,
    max_random_value: u32,
}

impl SlotTable {
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<Slot> {
        self.slots.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Sum of all weights; draws are taken from `[0, max_random_value)`.
    pub fn max_random_value(&self) -> u32 {
        self.max_random_value
    }

    /// Index of the first slot, in declaration order, containing `draw`.
    ///
    /// Returns `None` when the draw lands in a dead zone.
    pub fn resolve(&self, draw: f64) -> Option<usize> {
        self.slots.iter().position(|slot| slot.contains(draw))
    }

    /// Index used when a draw matches nothing: the first slot that can be
    /// selected at all, or the first slot when every weight is zero.
    ///
    /// Returns `None` only for an empty table.
    pub fn fallback(&self) -> Option<usize> {
        if self.slots.is_empty() {
            return None;
        }
        Some(
            self.slots
                .iter()
                .position(|slot| !slot.is_degenerate())
                .unwrap_or(0),
        )
    }

    /// Open intervals `(end, next_start)` between consecutive slots.
    pub fn dead_zones(&self) -> Vec<(u32, u32)> {
        self.slots
            .windows(2)
            .map(|pair| (pair[0].end, pair[1].start))
            .collect()
    }
}

/// Projects entry weights onto slots.
///
/// Pure: the entries are only read, and the result is rebuilt from scratch
/// on every call.
pub fn generate_slots(entries: &[Entry]) -> SlotTable {
    let mut slots = Vec::with_capacity(entries.len());
    let mut offset: u32 = 0;
    let mut max_random_value: u32 = 0;

    for entry in entries {
        let weight = u32::from(entry.weight.get());
        let slot = Slot {
            start: offset,
            end: offset + weight,
        };
        offset = slot.end + 1;
        max_random_value += weight;
        slots.push(slot);
    }

    SlotTable {
        slots,
        max_random_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(weights: &[u32]) -> Vec<Entry> {
        weights
            .iter()
            .enumerate()
            .map(|(i, &w)| Entry::try_new(i as i32, w, false).unwrap())
            .collect()
    }

    #[test]
    fn slots_follow_cumulative_weights_with_gaps() {
        let table = generate_slots(&entries(&[100, 0, 250, 5]));
        let weights = [100u32, 0, 250, 5];

        let mut prefix = 0;
        for (i, slot) in table.slots().iter().enumerate() {
            assert_eq!(slot.start, prefix + i as u32, "start of slot {i}");
            assert_eq!(slot.end, slot.start + weights[i], "end of slot {i}");
            prefix += weights[i];
        }
        assert_eq!(table.max_random_value(), 355);
    }

    #[test]
    fn empty_entries_produce_empty_table() {
        let table = generate_slots(&[]);
        assert!(table.is_empty());
        assert_eq!(table.max_random_value(), 0);
        assert_eq!(table.resolve(0.0), None);
        assert_eq!(table.fallback(), None);
    }

    #[test]
    fn resolve_uses_closed_slots_and_reports_gaps() {
        // [0, 10], gap (10, 11), [11, 31]
        let table = generate_slots(&entries(&[10, 20]));
        assert_eq!(table.resolve(0.0), Some(0));
        assert_eq!(table.resolve(10.0), Some(0));
        assert_eq!(table.resolve(10.5), None);
        assert_eq!(table.resolve(11.0), Some(1));
        assert_eq!(table.resolve(29.9), Some(1));
        assert_eq!(table.dead_zones(), vec![(10, 11)]);
    }

    #[test]
    fn zero_weight_slot_never_matches() {
        // [0, 0], gap (0, 1), [1, 1001]
        let table = generate_slots(&entries(&[0, 1000]));
        assert_eq!(table.resolve(0.0), None);
        assert_eq!(table.resolve(0.5), None);
        assert_eq!(table.resolve(1.0), Some(1));
        assert_eq!(table.fallback(), Some(1));
    }

    #[test]
    fn fallback_is_first_slot_when_all_weights_zero() {
        let table = generate_slots(&entries(&[0, 0, 0]));
        assert_eq!(table.max_random_value(), 0);
        assert_eq!(table.fallback(), Some(0));
    }
}
