//! Per-render state: the parameter sequence and the collected parameters.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use sqlweave_core::{SqlType, Value};

use super::strategy::PlaceholderStrategy;

/// Synthetic key of one bound parameter, displayed as `p1`, `p2`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParameterKey(u32);

impl ParameterKey {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// 1-based position of the parameter in the rendered statement.
    pub const fn index(self) -> u32 {
        self.0
    }

    pub fn name(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// The parameters bound while rendering one statement, in index order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    entries: BTreeMap<ParameterKey, Value>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look a parameter up by its name, e.g. `"p3"`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let index = name.strip_prefix('p')?.parse::<u32>().ok()?;
        self.entries.get(&ParameterKey(index))
    }

    pub fn get_key(&self, key: ParameterKey) -> Option<&Value> {
        self.entries.get(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParameterKey, &Value)> {
        self.entries.iter().map(|(key, value)| (*key, value))
    }

    pub fn keys(&self) -> impl Iterator<Item = ParameterKey> + '_ {
        self.entries.keys().copied()
    }

    /// Values in binding order, for positional placeholders.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }

    /// Values in binding order, cloned.
    pub fn to_vec(&self) -> Vec<Value> {
        self.entries.values().cloned().collect()
    }

    /// A JSON object `{"p1": ..., "p2": ...}`.
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .entries
            .iter()
            .map(|(key, value)| (key.name(), value.to_json()))
            .collect();
        serde_json::Value::Object(map)
    }

    pub(crate) fn insert(&mut self, key: ParameterKey, value: Value) {
        self.entries.insert(key, value);
    }
}

impl Serialize for Parameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(&key.name(), value)?;
        }
        map.end()
    }
}

/// State threaded through one render pass.
///
/// Nested sub-queries share the context of the statement that contains
/// them, so parameter numbers are unique across the whole SQL text.
pub struct RenderingContext<'s> {
    strategy: &'s dyn PlaceholderStrategy,
    next_index: u32,
    parameters: Parameters,
}

impl<'s> RenderingContext<'s> {
    pub fn new(strategy: &'s dyn PlaceholderStrategy) -> Self {
        Self {
            strategy,
            next_index: 1,
            parameters: Parameters::new(),
        }
    }

    /// Take the next key, record `value` under it and return its placeholder.
    pub fn bind(&mut self, value: Value, sql_type: Option<&SqlType>) -> String {
        let key = ParameterKey(self.next_index);
        self.next_index += 1;
        let placeholder = self.strategy.placeholder(key, sql_type);
        self.parameters.insert(key, value);
        placeholder
    }

    /// Number of parameters bound so far.
    pub fn bound(&self) -> usize {
        self.parameters.len()
    }

    pub fn into_parameters(self) -> Parameters {
        self.parameters
    }
}
