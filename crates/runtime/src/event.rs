use probability_core::{Resolution, Selection};
use serde::Serialize;

/// What caused a recalculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TriggerSource {
    /// The interval timer fired.
    Timer,
    /// A handle requested it.
    Manual,
}

/// Events emitted by a recalculation worker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SelectionEvent {
    /// A new value was selected
    Selected {
        selector: String,
        value: i32,
        draw: f64,
        resolution: Resolution,
        source: TriggerSource,
    },
    /// Automatic recalculation was switched on or off
    EnabledChanged { selector: String, enabled: bool },
}

impl SelectionEvent {
    pub(crate) fn selected(selector: &str, selection: &Selection, source: TriggerSource) -> Self {
        Self::Selected {
            selector: selector.to_owned(),
            value: selection.value,
            draw: selection.draw,
            resolution: selection.resolution,
            source,
        }
    }

    pub fn selector(&self) -> &str {
        match self {
            Self::Selected { selector, .. } | Self::EnabledChanged { selector, .. } => selector,
        }
    }
}
