//! Common error infrastructure for probability crates.
//!
//! Selection itself never fails: every entry configuration yields a defined
//! value. Errors only arise around it, when configuration is built or loaded
//! (for example a weight outside `0..=1000`) or when a background worker goes
//! away. Every such error reports a severity and a stable code so callers can
//! log them uniformly.

/// Severity level of an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input; retrying without changing the configuration fails again.
    ///
    /// Examples: weight above the allowed maximum, duplicate selector name
    Validation,

    /// Unexpected state, such as a worker task that stopped on its own.
    Internal,
}

impl ErrorSeverity {
    /// Returns the lowercase name used in log fields.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }
}

/// Common trait for all probability errors.
///
/// Implemented by the core, content and runtime error enums.
pub trait ProbabilityError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str;
}

/// Errors raised while constructing entries.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    /// Weight exceeds [`crate::Weight::MAX`].
    #[error("weight {weight} is out of range (0..={max})")]
    WeightOutOfRange { weight: u32, max: u16 },
}

impl ProbabilityError for EntryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            EntryError::WeightOutOfRange { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            EntryError::WeightOutOfRange { .. } => "ENTRY_WEIGHT_OUT_OF_RANGE",
        }
    }
}
