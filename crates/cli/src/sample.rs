//! Sample mode: recompute each selector repeatedly and tally the outcomes.
use std::collections::BTreeMap;
use std::fmt;

use probability_core::{RandomSource, Resolution};
use probability_runtime::{DriverRegistry, SelectorDriver};
use serde::Serialize;

/// Outcome tally for one value of a selector.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValueTally {
    pub value: i32,
    /// Sum of the weights of the entries holding this value.
    pub weight: u32,
    /// Configured share of the draw range.
    pub weight_share: f64,
    pub hits: u64,
    /// Observed share of all draws.
    pub share: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SelectorReport {
    pub selector: String,
    pub draws: u32,
    pub max_random_value: u32,
    pub values: Vec<ValueTally>,
    /// Selections per resolution path (`weighted`, `dead_zone`, `second_chance`).
    pub resolutions: BTreeMap<&'static str, u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SampleReport {
    pub seed: Option<u64>,
    pub selectors: Vec<SelectorReport>,
}

/// Samples every driver of `registry` `draws` times.
pub fn sample_registry(
    registry: &mut DriverRegistry,
    draws: u32,
    seed: Option<u64>,
) -> SampleReport {
    let selectors = registry
        .iter_mut()
        .map(|driver| sample_driver(driver, draws))
        .collect();
    SampleReport { seed, selectors }
}

pub fn sample_driver<R: RandomSource>(
    driver: &mut SelectorDriver<R>,
    draws: u32,
) -> SelectorReport {
    let mut values: BTreeMap<i32, (u32, u64)> = BTreeMap::new();
    for entry in driver.selector().entries() {
        values.entry(entry.value).or_default().0 += u32::from(entry.weight);
    }

    let mut resolutions = BTreeMap::new();
    let mut made = 0u64;
    for _ in 0..draws {
        let Some(selection) = driver.calculate() else {
            break;
        };
        made += 1;
        values.entry(selection.value).or_default().1 += 1;
        *resolutions
            .entry(<&'static str>::from(selection.resolution))
            .or_insert(0) += 1;
    }

    let max_random_value = driver.selector().max_random_value();
    let values = values
        .into_iter()
        .map(|(value, (weight, hits))| ValueTally {
            value,
            weight,
            weight_share: ratio(u64::from(weight), u64::from(max_random_value)),
            hits,
            share: ratio(hits, made),
        })
        .collect();

    tracing::debug!(selector = %driver.name(), draws = made, "sampled");

    SelectorReport {
        selector: driver.name().to_owned(),
        draws: u32::try_from(made).unwrap_or(u32::MAX),
        max_random_value,
        values,
        resolutions,
    }
}

fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

impl fmt::Display for SelectorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({} draws, max {})",
            self.selector, self.draws, self.max_random_value
        )?;
        writeln!(
            f,
            "  {:>8}  {:>6}  {:>8}  {:>8}  {:>8}",
            "value", "weight", "config", "hits", "observed"
        )?;
        for tally in &self.values {
            writeln!(
                f,
                "  {:>8}  {:>6}  {:>7.1}%  {:>8}  {:>7.1}%",
                tally.value,
                tally.weight,
                tally.weight_share * 100.0,
                tally.hits,
                tally.share * 100.0
            )?;
        }
        let paths = [
            Resolution::Weighted,
            Resolution::DeadZone,
            Resolution::SecondChance,
        ];
        for resolution in paths {
            let name = <&'static str>::from(resolution);
            if let Some(count) = self.resolutions.get(name) {
                writeln!(f, "  {name}: {count}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for SampleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.seed {
            Some(seed) => writeln!(f, "seed {seed}")?,
            None => writeln!(f, "seed: entropy")?,
        }
        for selector in &self.selectors {
            writeln!(f)?;
            write!(f, "{selector}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use probability_content::{Catalog, SelectorSpec};
    use probability_core::{Entry, PcgRng, Selector};
    use probability_runtime::TriggerPolicy;

    use super::*;

    fn driver(entries: Vec<Entry>) -> SelectorDriver<PcgRng> {
        SelectorDriver::new(
            "idle",
            Selector::with_rng(entries, PcgRng::seeded(8)),
            TriggerPolicy::Manual,
        )
    }

    #[test]
    fn alternating_pair_splits_evenly() {
        let mut driver = driver(vec![
            Entry::try_new(1, 500, false).unwrap(),
            Entry::try_new(2, 500, false).unwrap(),
        ]);
        let report = sample_driver(&mut driver, 100);

        assert_eq!(report.draws, 100);
        assert_eq!(report.max_random_value, 1000);
        assert_eq!(report.values.len(), 2);
        assert!(report.values.iter().all(|tally| tally.hits == 50));
        assert!(report.values.iter().all(|tally| tally.weight_share == 0.5));
    }

    #[test]
    fn empty_selector_reports_no_draws() {
        let mut driver = driver(Vec::new());
        let report = sample_driver(&mut driver, 10);
        assert_eq!(report.draws, 0);
        assert!(report.values.is_empty());
        assert!(report.resolutions.is_empty());
    }

    #[test]
    fn duplicate_values_share_a_row() {
        let mut driver = driver(vec![
            Entry::try_new(4, 100, true).unwrap(),
            Entry::try_new(4, 300, true).unwrap(),
        ]);
        let report = sample_driver(&mut driver, 20);
        assert_eq!(report.values.len(), 1);
        assert_eq!(report.values[0].weight, 400);
        assert_eq!(report.values[0].hits, 20);
    }

    #[test]
    fn registry_report_serializes_to_json() {
        let catalog = Catalog {
            selectors: vec![SelectorSpec::new(
                "single",
                vec![Entry::try_new(7, 10, true).unwrap()],
            )],
        };
        let mut registry = DriverRegistry::from_catalog(&catalog, Some(1));
        let report = sample_registry(&mut registry, 5, Some(1));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["seed"], 1);
        assert_eq!(json["selectors"][0]["selector"], "single");
        assert_eq!(json["selectors"][0]["values"][0]["hits"], 5);
        assert_eq!(json["selectors"][0]["resolutions"]["weighted"], 5);
        assert!(report.to_string().contains("single (5 draws, max 10)"));
    }
}
