//! Forwarding selected values to named parameters.
//!
//! The runtime does not know what a parameter is; it hands values to a
//! [`ParameterSink`] implemented by the host (an animation system, a UI, or
//! the in-memory [`ParameterTable`]).

use std::collections::HashMap;

use probability_content::{ParameterKind, ParameterSpec};
use serde::Serialize;

/// Receiver for parameter updates.
pub trait ParameterSink {
    fn set_integer(&mut self, name: &str, value: i32);
    fn set_float(&mut self, name: &str, value: f32);
}

/// A value as last written to a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum ParameterValue {
    Integer(i32),
    Float(f32),
}

/// Named target for a selector's value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterBinding {
    pub name: String,
    pub kind: ParameterKind,
}

impl ParameterBinding {
    pub fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Writes `value` to the sink using the bound parameter type.
    pub fn apply(&self, value: i32, sink: &mut dyn ParameterSink) {
        match self.kind {
            ParameterKind::Integer => sink.set_integer(&self.name, value),
            ParameterKind::Float => sink.set_float(&self.name, value as f32),
        }
    }
}

impl From<&ParameterSpec> for ParameterBinding {
    fn from(spec: &ParameterSpec) -> Self {
        Self::new(spec.name.clone(), spec.kind)
    }
}

/// In-memory parameter store.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ParameterTable {
    values: HashMap<String, ParameterValue>,
}

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<ParameterValue> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ParameterValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl ParameterSink for ParameterTable {
    fn set_integer(&mut self, name: &str, value: i32) {
        self.values.insert(name.to_owned(), ParameterValue::Integer(value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.values.insert(name.to_owned(), ParameterValue::Float(value));
    }
}

/// Sink that drops every update.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiscardParameters;

impl ParameterSink for DiscardParameters {
    fn set_integer(&mut self, _name: &str, _value: i32) {}
    fn set_float(&mut self, _name: &str, _value: f32) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_writes_with_parameter_kind() {
        let mut table = ParameterTable::new();

        ParameterBinding::new("IdleIndex", ParameterKind::Integer).apply(3, &mut table);
        ParameterBinding::new("Blend", ParameterKind::Float).apply(2, &mut table);

        assert_eq!(table.get("IdleIndex"), Some(ParameterValue::Integer(3)));
        assert_eq!(table.get("Blend"), Some(ParameterValue::Float(2.0)));
        assert_eq!(table.get("Missing"), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn binding_from_spec_keeps_name_and_kind() {
        let spec = ParameterSpec {
            name: "Bark".into(),
            kind: ParameterKind::Integer,
        };
        let binding = ParameterBinding::from(&spec);
        assert_eq!(binding.name, "Bark");
        assert_eq!(binding.kind, ParameterKind::Integer);
    }
}
