//! Weighted alternatives.
//!
//! An [`Entry`] is one candidate outcome of a selector. Entries are plain
//! configuration: the selector reads them but never rewrites them. Slot
//! bounds derived from the weights live in [`crate::slot::SlotTable`].

use crate::error::EntryError;

/// Relative likelihood of an entry, in `0..=1000`.
///
/// Weights are not normalized and do not need to sum to any fixed total.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u32", into = "u32")
)]
pub struct Weight(u16);

impl Weight {
    /// Largest accepted weight.
    pub const MAX: u16 = 1000;

    /// Weight at or above which a non-repeatable entry is flagged.
    pub const HIGH_THRESHOLD: u16 = 350;

    pub const ZERO: Self = Self(0);

    /// Creates a weight, rejecting values above [`Weight::MAX`].
    pub fn new(weight: u32) -> Result<Self, EntryError> {
        if weight > u32::from(Self::MAX) {
            return Err(EntryError::WeightOutOfRange {
                weight,
                max: Self::MAX,
            });
        }
        Ok(Self(weight as u16))
    }

    #[inline]
    pub const fn get(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<u32> for Weight {
    type Error = EntryError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Weight> for u32 {
    fn from(weight: Weight) -> Self {
        u32::from(weight.0)
    }
}

impl core::fmt::Display for Weight {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One weighted alternative.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entry {
    /// Outcome reported when this entry is selected.
    pub value: i32,

    pub weight: Weight,

    /// When false, the selector avoids picking this entry's value twice in a row.
    #[cfg_attr(feature = "serde", serde(default))]
    pub repeatable: bool,

    /// Free-form label for humans; ignored by selection.
    #[cfg_attr(feature = "serde", serde(default))]
    pub comment: Option<String>,
}

impl Entry {
    /// Creates a non-repeatable entry without a comment.
    pub fn new(value: i32, weight: Weight) -> Self {
        Self {
            value,
            weight,
            repeatable: false,
            comment: None,
        }
    }

    /// Creates an entry from a raw weight, rejecting weights above [`Weight::MAX`].
    pub fn try_new(value: i32, weight: u32, repeatable: bool) -> Result<Self, EntryError> {
        Ok(Self::new(value, Weight::new(weight)?).with_repeatable(repeatable))
    }

    #[must_use]
    pub fn with_repeatable(mut self, repeatable: bool) -> Self {
        self.repeatable = repeatable;
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Returns true for a heavily weighted entry that may not repeat.
    ///
    /// Such entries force frequent re-draws; marking them repeatable is
    /// usually what the author intended.
    pub fn is_high_weight_non_repeatable(&self) -> bool {
        self.weight.get() >= Weight::HIGH_THRESHOLD && !self.repeatable
    }
}

/// Value for an entry appended after `entries`.
///
/// One past the last entry's value, or `0` for an empty list.
pub fn next_entry_value(entries: &[Entry]) -> i32 {
    entries
        .last()
        .map_or(0, |entry| entry.value.saturating_add(1))
}
