//! Read-only snapshot of a selector's last cycle.

use core::fmt;

use crate::entry::Entry;
use crate::slot::{Slot, SlotTable};

/// One row of a [`Diagnostics`] snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotReport {
    pub value: i32,
    pub weight: u16,
    pub repeatable: bool,
    /// Bounds from the last cycle; `None` until the entry has been slotted.
    pub slot: Option<Slot>,
    pub comment: Option<String>,
}

/// State of a selector after its last cycle.
///
/// Rows always list the current entries. Slot bounds and dead zones reflect
/// the weights at the time of the last cycle, so once the entries are edited
/// every row shows up without a slot until the next recompute.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostics {
    pub current_value: i32,
    pub max_random_value: u32,
    pub current_random_value: f64,
    pub slots: Vec<SlotReport>,
    pub dead_zones: Vec<(u32, u32)>,
}

impl Diagnostics {
    pub(crate) fn capture(
        entries: &[Entry],
        table: &SlotTable,
        slots_current: bool,
        current_value: i32,
        current_random_value: f64,
    ) -> Self {
        let slots = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| SlotReport {
                value: entry.value,
                weight: entry.weight.get(),
                repeatable: entry.repeatable,
                slot: table.get(index).filter(|_| slots_current),
                comment: entry.comment.clone(),
            })
            .collect();

        Self {
            current_value,
            max_random_value: table.max_random_value(),
            current_random_value,
            slots,
            dead_zones: table.dead_zones(),
        }
    }

    /// Row of the slot containing the last draw, if any.
    pub fn matched(&self) -> Option<&SlotReport> {
        let draw = self.current_random_value;
        self.slots
            .iter()
            .find(|row| row.slot.is_some_and(|slot| slot.contains(draw)))
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "current={} draw={:.3} max={}",
            self.current_value, self.current_random_value, self.max_random_value
        )?;
        for row in &self.slots {
            write!(f, "  {:>6}  w={:<4} ", row.value, row.weight)?;
            match row.slot {
                Some(slot) => write!(f, "[{}, {}]", slot.start, slot.end)?,
                None => write!(f, "[unslotted]")?,
            }
            if row.repeatable {
                write!(f, " repeatable")?;
            }
            if let Some(comment) = &row.comment {
                write!(f, "  # {comment}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
