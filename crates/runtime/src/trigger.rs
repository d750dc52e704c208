//! When a driver recalculates its selector.

use std::time::Duration;

use probability_content::{DEFAULT_INTERVAL_SECONDS, TriggerSpec, interval_duration};

/// Recalculation policy of a [`crate::SelectorDriver`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TriggerPolicy {
    /// Recalculate only when asked.
    #[default]
    Manual,
    /// Recalculate once per `period` while enabled.
    Interval(Duration),
    /// Recalculate each time the owning state is entered.
    OnStateEnter,
}

impl TriggerPolicy {
    pub fn default_interval() -> Self {
        Self::Interval(Duration::from_secs_f32(DEFAULT_INTERVAL_SECONDS))
    }

    pub fn period(&self) -> Option<Duration> {
        match self {
            Self::Interval(period) => Some(*period),
            Self::Manual | Self::OnStateEnter => None,
        }
    }
}

impl From<TriggerSpec> for TriggerPolicy {
    fn from(spec: TriggerSpec) -> Self {
        match spec {
            TriggerSpec::Manual => Self::Manual,
            TriggerSpec::OnStateEnter => Self::OnStateEnter,
            // Hand-built specs skip catalog validation.
            TriggerSpec::Interval { seconds } => interval_duration(seconds)
                .map_or_else(Self::default_interval, Self::Interval),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_spec_converts_to_period() {
        let policy = TriggerPolicy::from(TriggerSpec::Interval { seconds: 1.5 });
        assert_eq!(policy.period(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn invalid_interval_uses_default_period() {
        let policy = TriggerPolicy::from(TriggerSpec::Interval { seconds: -1.0 });
        assert_eq!(policy, TriggerPolicy::default_interval());
        assert_eq!(policy.period(), Some(Duration::from_millis(500)));
    }

    #[test]
    fn unrepresentable_intervals_use_default_period() {
        for seconds in [1e20, 1e-12, f32::NAN] {
            let policy = TriggerPolicy::from(TriggerSpec::Interval { seconds });
            assert_eq!(policy, TriggerPolicy::default_interval(), "{seconds}");
        }
    }

    #[test]
    fn non_interval_policies_have_no_period() {
        assert_eq!(TriggerPolicy::from(TriggerSpec::Manual).period(), None);
        assert_eq!(TriggerPolicy::from(TriggerSpec::OnStateEnter).period(), None);
    }
}
