//! Selector drivers.
//!
//! A [`SelectorDriver`] is the composition layer around one
//! [`Selector`]: it decides *when* to recompute (per [`TriggerPolicy`] and
//! the enable flag) and *where* the value goes (an optional
//! [`ParameterBinding`]). The selector itself stays unaware of both.
//!
//! Time is supplied by the caller through [`SelectorDriver::advance`], so
//! drivers work the same under a frame loop, a test, or the async
//! [`crate::RecalculationWorker`].

use std::time::Duration;

use probability_content::SelectorSpec;
use probability_core::{
    Diagnostics, PcgRng, RandomSource, Selection, Selector, ThreadRandom, derive_seed,
};

use crate::binding::{ParameterBinding, ParameterSink};
use crate::trigger::TriggerPolicy;

/// Type-erased random source used by drivers built from catalog specs.
pub type DynRandom = Box<dyn RandomSource + Send>;

/// A selector plus the policy that drives it.
pub struct SelectorDriver<R = DynRandom> {
    name: String,
    selector: Selector<R>,
    policy: TriggerPolicy,
    enabled: bool,
    binding: Option<ParameterBinding>,
    /// Time accumulated toward the next interval recalculation.
    elapsed: Duration,
}

impl SelectorDriver<DynRandom> {
    /// Builds a driver from a catalog spec.
    ///
    /// Seeding:
    /// - spec seed and base seed: both are mixed with the selector name
    /// - only one of them: that seed (the base seed is mixed with the name)
    /// - neither: operating system entropy
    pub fn from_spec(spec: &SelectorSpec, base_seed: Option<u64>) -> Self {
        let rng: DynRandom = match (spec.seed, base_seed) {
            (Some(seed), Some(base)) => {
                Box::new(PcgRng::seeded(derive_seed(base ^ seed, &spec.name)))
            }
            (Some(seed), None) => Box::new(PcgRng::seeded(seed)),
            (None, Some(base)) => Box::new(PcgRng::seeded(derive_seed(base, &spec.name))),
            (None, None) => Box::new(ThreadRandom::from_entropy()),
        };

        let mut selector = Selector::with_rng(spec.entries.clone(), rng);
        if let Some(max_attempts) = spec.max_attempts {
            selector = selector.with_max_attempts(max_attempts);
        }

        let mut driver = Self::new(spec.name.clone(), selector, spec.trigger.into());
        driver.enabled = spec.enabled;
        driver.binding = spec.parameter.as_ref().map(ParameterBinding::from);
        driver
    }
}

impl<R: RandomSource> SelectorDriver<R> {
    /// Creates a disabled, unbound driver.
    pub fn new(name: impl Into<String>, selector: Selector<R>, policy: TriggerPolicy) -> Self {
        Self {
            name: name.into(),
            selector,
            policy,
            enabled: false,
            binding: None,
            elapsed: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_binding(mut self, binding: ParameterBinding) -> Self {
        self.binding = Some(binding);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn selector(&self) -> &Selector<R> {
        &self.selector
    }

    /// Mutable selector access for configuration edits between cycles.
    pub fn selector_mut(&mut self) -> &mut Selector<R> {
        &mut self.selector
    }

    pub fn policy(&self) -> TriggerPolicy {
        self.policy
    }

    pub fn binding(&self) -> Option<&ParameterBinding> {
        self.binding.as_ref()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn current_value(&self) -> i32 {
        self.selector.current_value()
    }

    pub fn diagnostics(&self) -> Diagnostics {
        self.selector.diagnostics()
    }

    /// Turns automatic recalculation on or off.
    ///
    /// Returns true when the flag changed; the interval timer then restarts
    /// from zero.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        if self.enabled == enabled {
            return false;
        }
        self.enabled = enabled;
        self.elapsed = Duration::ZERO;
        tracing::debug!(selector = %self.name, enabled, "automatic recalculation toggled");
        true
    }

    /// Recomputes immediately, regardless of policy or enable flag.
    pub fn calculate(&mut self) -> Option<Selection> {
        self.selector.recompute()
    }

    /// Recomputes immediately and forwards the value through the binding.
    pub fn calculate_into(&mut self, sink: &mut dyn ParameterSink) -> Option<Selection> {
        let selection = self.selector.recompute();
        self.forward(sink);
        selection
    }

    /// Handles entry into the owning state.
    ///
    /// Only drivers with [`TriggerPolicy::OnStateEnter`] react; the current
    /// value is forwarded even when the selector has no entries.
    pub fn on_state_enter(&mut self, sink: &mut dyn ParameterSink) -> Option<Selection> {
        if self.policy != TriggerPolicy::OnStateEnter {
            tracing::trace!(selector = %self.name, "state enter ignored by policy");
            return None;
        }
        self.calculate_into(sink)
    }

    /// Advances the interval timer by `elapsed`.
    ///
    /// Recomputes once per full period accumulated while enabled and returns
    /// the selections made, oldest first.
    pub fn advance(&mut self, elapsed: Duration, sink: &mut dyn ParameterSink) -> Vec<Selection> {
        let Some(period) = self.policy.period() else {
            return Vec::new();
        };
        if !self.enabled || period.is_zero() {
            return Vec::new();
        }

        self.elapsed += elapsed;
        let mut selections = Vec::new();
        while self.elapsed >= period {
            self.elapsed -= period;
            if let Some(selection) = self.calculate_into(sink) {
                selections.push(selection);
            }
        }
        selections
    }

    fn forward(&self, sink: &mut dyn ParameterSink) {
        if let Some(binding) = &self.binding {
            binding.apply(self.selector.current_value(), sink);
        }
    }
}

#[cfg(test)]
mod tests {
    use probability_content::{ParameterKind, ParameterSpec, TriggerSpec};
    use probability_core::Entry;

    use super::*;
    use crate::binding::{DiscardParameters, ParameterTable, ParameterValue};

    fn entries() -> Vec<Entry> {
        vec![
            Entry::try_new(1, 500, false).unwrap(),
            Entry::try_new(2, 500, false).unwrap(),
        ]
    }

    fn interval_driver(period_ms: u64) -> SelectorDriver<PcgRng> {
        SelectorDriver::new(
            "idle",
            Selector::with_rng(entries(), PcgRng::seeded(4)),
            TriggerPolicy::Interval(Duration::from_millis(period_ms)),
        )
    }

    #[test]
    fn disabled_interval_driver_does_nothing() {
        let mut driver = interval_driver(100);
        let made = driver.advance(Duration::from_secs(5), &mut DiscardParameters);
        assert!(made.is_empty());
        assert_eq!(driver.current_value(), 0);
    }

    #[test]
    fn interval_driver_recomputes_once_per_period() {
        let mut driver = interval_driver(100).with_enabled(true);
        let mut sink = DiscardParameters;

        assert!(driver.advance(Duration::from_millis(60), &mut sink).is_empty());
        assert_eq!(driver.advance(Duration::from_millis(60), &mut sink).len(), 1);
        assert_eq!(driver.advance(Duration::from_millis(350), &mut sink).len(), 3);
    }

    #[test]
    fn toggling_enable_restarts_the_timer() {
        let mut driver = interval_driver(100).with_enabled(true);
        let mut sink = DiscardParameters;

        driver.advance(Duration::from_millis(90), &mut sink);
        assert!(!driver.set_enabled(true), "unchanged flag is not a toggle");
        assert!(driver.set_enabled(false));
        assert!(driver.set_enabled(true));
        assert!(driver.advance(Duration::from_millis(90), &mut sink).is_empty());
        assert_eq!(driver.advance(Duration::from_millis(10), &mut sink).len(), 1);
    }

    #[test]
    fn manual_calculate_ignores_enable_flag() {
        let mut driver = interval_driver(100);
        assert!(driver.calculate().is_some());
        assert_ne!(driver.current_value(), 0);
    }

    #[test]
    fn state_enter_forwards_to_binding() {
        let mut driver = SelectorDriver::new(
            "wag",
            Selector::with_rng(entries(), PcgRng::seeded(2)),
            TriggerPolicy::OnStateEnter,
        )
        .with_binding(ParameterBinding::new("WagIndex", ParameterKind::Integer));
        let mut table = ParameterTable::new();

        let selection = driver.on_state_enter(&mut table).unwrap();
        assert_eq!(
            table.get("WagIndex"),
            Some(ParameterValue::Integer(selection.value))
        );

        let next = driver.on_state_enter(&mut table).unwrap();
        assert_ne!(next.value, selection.value);
    }

    #[test]
    fn state_enter_is_ignored_by_other_policies() {
        let mut driver = interval_driver(100).with_enabled(true);
        assert!(driver.on_state_enter(&mut DiscardParameters).is_none());
    }

    #[test]
    fn from_spec_applies_configuration() {
        let mut spec = SelectorSpec::new("bark", entries());
        spec.trigger = TriggerSpec::Interval { seconds: 0.25 };
        spec.enabled = true;
        spec.seed = Some(9);
        spec.max_attempts = Some(5);
        spec.parameter = Some(ParameterSpec {
            name: "BarkBlend".into(),
            kind: ParameterKind::Float,
        });

        let mut driver = SelectorDriver::from_spec(&spec, None);
        assert_eq!(driver.name(), "bark");
        assert!(driver.is_enabled());
        assert_eq!(
            driver.policy(),
            TriggerPolicy::Interval(Duration::from_millis(250))
        );
        assert_eq!(driver.selector().max_attempts(), 5);

        let mut table = ParameterTable::new();
        let made = driver.advance(Duration::from_millis(500), &mut table);
        assert_eq!(made.len(), 2);
        assert_eq!(
            table.get("BarkBlend"),
            Some(ParameterValue::Float(driver.current_value() as f32))
        );
    }

    #[test]
    fn seeded_specs_replay_identically() {
        let mut spec = SelectorSpec::new("idle", entries());
        spec.seed = Some(77);

        let mut a = SelectorDriver::from_spec(&spec, Some(1));
        let mut b = SelectorDriver::from_spec(&spec, Some(1));
        let seq_a: Vec<i32> = (0..20).filter_map(|_| a.calculate()).map(|s| s.value).collect();
        let seq_b: Vec<i32> = (0..20).filter_map(|_| b.calculate()).map(|s| s.value).collect();
        assert_eq!(seq_a, seq_b);
    }
}
