use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Value of a free-form case attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{n:.0}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Open key/value metadata attached to entities and links.
///
/// Only displayed, never interpreted. Keys are kept sorted so the display order is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Option<AttributeValue>>")]
#[serde(into = "BTreeMap<String, Option<AttributeValue>>")]
pub struct Attributes(Vec<(String, AttributeValue)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: AttributeValue) {
        let key = key.into();
        match self.0.binary_search_by(|(k, _)| k.as_str().cmp(&key)) {
            Ok(pos) => self.0[pos].1 = value,
            Err(pos) => self.0.insert(pos, (key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.0
            .binary_search_by(|(k, _)| k.as_str().cmp(key))
            .ok()
            .map(|pos| &self.0[pos].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, Option<AttributeValue>>> for Attributes {
    fn from(map: BTreeMap<String, Option<AttributeValue>>) -> Self {
        // null values are absent keys
        Self(
            map.into_iter()
                .filter_map(|(k, v)| v.map(|v| (k, v)))
                .collect(),
        )
    }
}

impl From<Attributes> for BTreeMap<String, Option<AttributeValue>> {
    fn from(attrs: Attributes) -> Self {
        attrs.0.into_iter().map(|(k, v)| (k, Some(v))).collect()
    }
}

impl<K: Into<String>> FromIterator<(K, AttributeValue)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (K, AttributeValue)>>(iter: T) -> Self {
        let mut attrs = Self::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}
