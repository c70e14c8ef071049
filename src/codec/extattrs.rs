//! Extensible attributes
//!
//! The store wraps every attribute value: `{"Site": {"value": "blr"}}`.
//! `ExtAttrs` keeps the flat `name -> value` view in memory.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtAttrs(BTreeMap<String, Value>);

#[derive(Serialize)]
struct WrappedRef<'a> {
    value: &'a Value,
}

#[derive(Deserialize)]
struct Wrapped {
    value: Value,
}

impl ExtAttrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ExtAttrs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl Serialize for ExtAttrs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, &WrappedRef { value })?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ExtAttrs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wrapped = Option::<BTreeMap<String, Wrapped>>::deserialize(deserializer)?;
        Ok(Self(
            wrapped
                .unwrap_or_default()
                .into_iter()
                .map(|(name, w)| (name, w.value))
                .collect(),
        ))
    }
}
