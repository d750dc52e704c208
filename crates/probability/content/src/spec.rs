//! Selector definitions as they appear in catalog files.
//!
//! Specs are plain data. The runtime turns a [`SelectorSpec`] into a driver;
//! nothing here draws random numbers.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use probability_core::{Entry, ErrorSeverity, ProbabilityError};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Seconds between automatic recalculations when none is configured.
pub const DEFAULT_INTERVAL_SECONDS: f32 = 0.5;

/// A file's worth of named selectors.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub selectors: Vec<SelectorSpec>,
}

impl Catalog {
    pub fn get(&self, name: &str) -> Option<&SelectorSpec> {
        self.selectors.iter().find(|spec| spec.name == name)
    }

    /// Checks structural rules every catalog must satisfy.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for spec in &self.selectors {
            if spec.name.trim().is_empty() {
                return Err(CatalogError::EmptyName);
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(CatalogError::DuplicateName(spec.name.clone()));
            }
            if let TriggerSpec::Interval { seconds } = spec.trigger
                && interval_duration(seconds).is_none()
            {
                return Err(CatalogError::InvalidInterval {
                    selector: spec.name.clone(),
                    seconds,
                });
            }
        }
        Ok(())
    }

    /// Collects authoring hints that do not prevent loading.
    pub fn advisories(&self) -> Vec<Advisory> {
        self.selectors.iter().flat_map(SelectorSpec::advisories).collect()
    }
}

/// Converts interval seconds to a period.
///
/// Returns `None` for values that are not finite, not positive, too large
/// for a [`Duration`], or so small that they round down to zero.
pub fn interval_duration(seconds: f32) -> Option<Duration> {
    Duration::try_from_secs_f32(seconds)
        .ok()
        .filter(|period| !period.is_zero())
}

/// Configuration for one selector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectorSpec {
    pub name: String,

    #[serde(default)]
    pub entries: Vec<Entry>,

    #[serde(default)]
    pub trigger: TriggerSpec,

    /// Gates automatic recalculation only; manual triggers always run.
    #[serde(default)]
    pub enabled: bool,

    /// Parameter the selected value is forwarded to.
    #[serde(default)]
    pub parameter: Option<ParameterSpec>,

    /// Fixed seed for reproducible sequences; combined with the base seed if one is set.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Anti-repeat retry bound; the selector default applies when absent.
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

impl SelectorSpec {
    pub fn new(name: impl Into<String>, entries: Vec<Entry>) -> Self {
        Self {
            name: name.into(),
            entries,
            trigger: TriggerSpec::default(),
            enabled: false,
            parameter: None,
            seed: None,
            max_attempts: None,
        }
    }

    pub fn advisories(&self) -> Vec<Advisory> {
        let mut found = Vec::new();

        if self.entries.is_empty() {
            found.push(Advisory::NoEntries {
                selector: self.name.clone(),
            });
        } else if self.entries.iter().all(|entry| entry.weight.is_zero()) {
            found.push(Advisory::AllWeightsZero {
                selector: self.name.clone(),
            });
        }

        for entry in &self.entries {
            if entry.is_high_weight_non_repeatable() {
                found.push(Advisory::HighWeightNonRepeatable {
                    selector: self.name.clone(),
                    value: entry.value,
                    weight: entry.weight.get(),
                });
            }
        }

        found
    }
}

/// When a selector recalculates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum TriggerSpec {
    /// Only on explicit request.
    #[default]
    Manual,
    /// Every `seconds` while enabled.
    Interval { seconds: f32 },
    /// Each time the owner enters its state.
    OnStateEnter,
}

/// Target parameter for the selected value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(default)]
    pub kind: ParameterKind,
}

/// Type of the parameter receiving the value.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ParameterKind {
    Integer,
    #[default]
    Float,
}

/// Structural problems that make a catalog unusable.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("selector name must not be empty")]
    EmptyName,

    #[error("duplicate selector name '{0}'")]
    DuplicateName(String),

    #[error(
        "selector '{selector}' has invalid interval {seconds}s \
         (must be a positive, representable number of seconds)"
    )]
    InvalidInterval { selector: String, seconds: f32 },
}

impl ProbabilityError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            CatalogError::EmptyName => "CATALOG_EMPTY_NAME",
            CatalogError::DuplicateName(_) => "CATALOG_DUPLICATE_NAME",
            CatalogError::InvalidInterval { .. } => "CATALOG_INVALID_INTERVAL",
        }
    }
}

/// Authoring hints reported while loading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Advisory {
    NoEntries { selector: String },
    AllWeightsZero { selector: String },
    HighWeightNonRepeatable { selector: String, value: i32, weight: u16 },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::NoEntries { selector } => {
                write!(f, "selector '{selector}' has no entries and will never change")
            }
            Advisory::AllWeightsZero { selector } => {
                write!(f, "selector '{selector}' has only zero weights; its first entry always wins")
            }
            Advisory::HighWeightNonRepeatable {
                selector,
                value,
                weight,
            } => write!(
                f,
                "selector '{selector}': value {value} has weight {weight} but is not repeatable; \
                 consider marking it repeatable"
            ),
        }
    }
}
