//! The weighted selector.
//!
//! A [`Selector`] owns an ordered list of [`Entry`] values and the value it
//! picked last. Each [`Selector::recompute`] call is a complete cycle:
//!
//! 1. Empty entry list: nothing happens.
//! 2. Slots are regenerated from the current weights.
//! 3. A value is drawn uniformly from `[0, max_random_value)` and resolved to
//!    the first slot containing it. A draw in a dead zone resolves to the
//!    first selectable entry.
//! 4. If the result is a non-repeatable entry whose value equals the current
//!    value, the draw is repeated up to `max_attempts` times. If that still
//!    fails and other entries exist, one of them is chosen uniformly,
//!    ignoring weights.
//!
//! The only state carried between cycles is the current value, which feeds
//! the anti-repeat check of the next cycle.

use strum::{Display, EnumString, IntoStaticStr};

use crate::diagnostics::Diagnostics;
use crate::entry::{Entry, next_entry_value};
use crate::rng::{RandomSource, ThreadRandom};
use crate::slot::{SlotTable, generate_slots};

/// How the value of a cycle was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Resolution {
    /// The draw landed inside an entry's slot.
    Weighted,
    /// The draw landed between slots; the fallback entry was used.
    DeadZone,
    /// Re-draws kept repeating the current value; another entry was picked uniformly.
    SecondChance,
}

/// Outcome of one [`Selector::recompute`] cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Selection {
    pub value: i32,
    /// Index of the selected entry in declaration order.
    pub index: usize,
    /// Last draw taken during the cycle.
    pub draw: f64,
    pub resolution: Resolution,
    /// Number of weighted draws taken (at least one).
    pub attempts: u32,
}

/// Weighted random selection with an anti-repeat policy.
#[derive(Clone, Debug)]
pub struct Selector<R = ThreadRandom> {
    entries: Vec<Entry>,
    current_value: i32,
    max_random_value: u32,
    current_random_value: f64,
    slots: SlotTable,
    /// False once the entries change after the last slot generation.
    slots_current: bool,
    max_attempts: u32,
    rng: R,
}

impl Selector<ThreadRandom> {
    /// Creates a selector drawing from operating system entropy.
    pub fn new(entries: Vec<Entry>) -> Self {
        Self::with_rng(entries, ThreadRandom::from_entropy())
    }
}

impl<R: RandomSource> Selector<R> {
    /// Attempts allowed before the uniform second-chance pick.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;

    pub fn with_rng(entries: Vec<Entry>, rng: R) -> Self {
        Self {
            entries,
            current_value: 0,
            max_random_value: 0,
            current_random_value: 0.0,
            slots: SlotTable::default(),
            slots_current: true,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            rng,
        }
    }

    /// Sets the anti-repeat retry bound (minimum 1).
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Seeds the current value, as if it had been selected previously.
    #[must_use]
    pub fn with_current_value(mut self, value: i32) -> Self {
        self.current_value = value;
        self
    }

    // ===== configuration =====

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Mutable access for the configuration layer; edits apply from the next cycle.
    pub fn entries_mut(&mut self) -> &mut Vec<Entry> {
        self.slots_current = false;
        &mut self.entries
    }

    pub fn set_entries(&mut self, entries: Vec<Entry>) {
        self.slots_current = false;
        self.entries = entries;
    }

    /// Appends a zero-weight entry whose value follows the last entry.
    pub fn push_entry(&mut self) -> &mut Entry {
        let value = next_entry_value(&self.entries);
        self.slots_current = false;
        self.entries.push(Entry::new(value, Default::default()));
        let last = self.entries.len() - 1;
        &mut self.entries[last]
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    // ===== reads =====

    /// Last accepted value; `0` before any selection.
    pub fn current_value(&self) -> i32 {
        self.current_value
    }

    /// Current value for consumers driving a float parameter.
    pub fn current_value_f32(&self) -> f32 {
        self.current_value as f32
    }

    /// Sum of weights at the last cycle.
    pub fn max_random_value(&self) -> u32 {
        self.max_random_value
    }

    /// Raw draw that produced the last selection.
    pub fn current_random_value(&self) -> f64 {
        self.current_random_value
    }

    /// Slots generated at the last cycle.
    pub fn slots(&self) -> &SlotTable {
        &self.slots
    }

    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics::capture(
            &self.entries,
            &self.slots,
            self.slots_current,
            self.current_value,
            self.current_random_value,
        )
    }

    // ===== selection =====

    /// Runs one draw-and-select cycle.
    ///
    /// Returns `None` (leaving all state untouched) when there are no entries.
    pub fn recompute(&mut self) -> Option<Selection> {
        if self.entries.is_empty() {
            tracing::trace!("recompute skipped: no entries");
            return None;
        }

        self.slots = generate_slots(&self.entries);
        self.slots_current = true;
        self.max_random_value = self.slots.max_random_value();

        let mut attempts = 0;
        let (mut index, mut resolution) = loop {
            attempts += 1;
            let resolved = self.draw_once();
            tracing::trace!(
                attempt = attempts,
                draw = self.current_random_value,
                index = resolved.0,
                "selection attempt"
            );
            if !self.is_repeat(resolved.0)
                || attempts >= self.max_attempts
                || !self.has_alternative()
            {
                break resolved;
            }
        };

        if self.is_repeat(index) && self.entries.len() > 1 {
            index = self.second_chance(index);
            resolution = Resolution::SecondChance;
            tracing::debug!(
                attempts,
                index,
                "re-draws exhausted, picked uniformly among remaining entries"
            );
        }

        let value = self.entries[index].value;
        self.current_value = value;

        tracing::debug!(
            value,
            index,
            draw = self.current_random_value,
            max = self.max_random_value,
            %resolution,
            "selected"
        );

        Some(Selection {
            value,
            index,
            draw: self.current_random_value,
            resolution,
            attempts,
        })
    }

    /// Draws once and resolves the draw to an entry index.
    fn draw_once(&mut self) -> (usize, Resolution) {
        let draw = self.rng.draw(self.max_random_value);
        self.current_random_value = draw;

        match self.slots.resolve(draw) {
            Some(index) => (index, Resolution::Weighted),
            None => {
                // Entries are non-empty here, so a fallback always exists.
                let index = self.slots.fallback().unwrap_or(0);
                tracing::debug!(draw, index, "draw landed in a dead zone");
                (index, Resolution::DeadZone)
            }
        }
    }

    /// True when selecting `index` would repeat a non-repeatable value.
    fn is_repeat(&self, index: usize) -> bool {
        let entry = &self.entries[index];
        !entry.repeatable && entry.value == self.current_value
    }

    /// True when at least one entry could be accepted without repeating.
    fn has_alternative(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.repeatable || entry.value != self.current_value)
    }

    /// Uniform pick among the entries other than `rejected`.
    ///
    /// Entries carrying a different value are preferred; when every other
    /// entry shares the current value, repetition is unavoidable.
    fn second_chance(&mut self, rejected: usize) -> usize {
        let current = self.current_value;
        let mut candidates: Vec<usize> = (0..self.entries.len())
            .filter(|&i| i != rejected && self.entries[i].value != current)
            .collect();
        if candidates.is_empty() {
            candidates = (0..self.entries.len()).filter(|&i| i != rejected).collect();
        }
        candidates[self.rng.index(candidates.len())]
    }
}
