//! Named collection of drivers built from a catalog.

use std::time::Duration;

use probability_content::Catalog;
use probability_core::Selection;

use crate::binding::ParameterSink;
use crate::driver::{DynRandom, SelectorDriver};
use crate::error::{Result, RuntimeError};

/// All drivers of a catalog, in catalog order.
pub struct DriverRegistry {
    drivers: Vec<SelectorDriver<DynRandom>>,
}

impl DriverRegistry {
    /// Builds one driver per selector spec.
    ///
    /// With a base seed every driver gets its own reproducible stream.
    pub fn from_catalog(catalog: &Catalog, base_seed: Option<u64>) -> Self {
        let drivers = catalog
            .selectors
            .iter()
            .map(|spec| SelectorDriver::from_spec(spec, base_seed))
            .collect();
        Self { drivers }
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.drivers.iter().map(SelectorDriver::name)
    }

    pub fn get(&self, name: &str) -> Option<&SelectorDriver<DynRandom>> {
        self.drivers.iter().find(|driver| driver.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut SelectorDriver<DynRandom>> {
        self.drivers.iter_mut().find(|driver| driver.name() == name)
    }

    /// Manually recomputes one selector.
    pub fn calculate(&mut self, name: &str) -> Result<Option<Selection>> {
        self.get_mut(name)
            .map(SelectorDriver::calculate)
            .ok_or_else(|| RuntimeError::UnknownSelector(name.to_owned()))
    }

    /// Signals entry into the state owning `name`.
    pub fn on_state_enter(
        &mut self,
        name: &str,
        sink: &mut dyn ParameterSink,
    ) -> Result<Option<Selection>> {
        let driver = self
            .get_mut(name)
            .ok_or_else(|| RuntimeError::UnknownSelector(name.to_owned()))?;
        Ok(driver.on_state_enter(sink))
    }

    /// Advances every interval driver; returns selections tagged by selector name.
    pub fn advance_all(
        &mut self,
        elapsed: Duration,
        sink: &mut dyn ParameterSink,
    ) -> Vec<(String, Selection)> {
        let mut made = Vec::new();
        for driver in &mut self.drivers {
            for selection in driver.advance(elapsed, sink) {
                made.push((driver.name().to_owned(), selection));
            }
        }
        made
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectorDriver<DynRandom>> {
        self.drivers.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SelectorDriver<DynRandom>> {
        self.drivers.iter_mut()
    }

    pub fn into_drivers(self) -> Vec<SelectorDriver<DynRandom>> {
        self.drivers
    }
}
