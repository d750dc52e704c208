//! Weighted random selection with an anti-repeat policy.
//!
//! `probability-core` picks a discrete value from a list of weighted
//! [`Entry`] alternatives. Entries marked non-repeatable are not picked twice
//! in a row when an alternative exists. The chosen value is meant to drive an
//! external parameter, but this crate knows nothing about who consumes it.
//!
//! - [`entry`]: entries and weights
//! - [`slot`]: pure projection of weights onto cumulative ranges
//! - [`selector`]: the draw-and-select cycle
//! - [`rng`]: seeded and entropy-backed random sources
//! - [`diagnostics`]: snapshots of the last cycle
//!
//! All inputs are legal: an empty list, zero weights or a single
//! non-repeatable entry each produce a defined result, and
//! [`Selector::recompute`] always terminates.
pub mod diagnostics;
pub mod entry;
pub mod error;
pub mod rng;
pub mod selector;
pub mod slot;

pub use diagnostics::{Diagnostics, SlotReport};
pub use entry::{Entry, Weight, next_entry_value};
pub use error::{EntryError, ErrorSeverity, ProbabilityError};
pub use rng::{PcgRng, RandomSource, ThreadRandom, derive_seed};
pub use selector::{Resolution, Selection, Selector};
pub use slot::{Slot, SlotTable, generate_slots};
