use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttributeError {
    #[error("attribute {0:?} is missing")]
    Missing(String),
    #[error("attribute {key:?} has unparsable value {value:?}")]
    Invalid { key: String, value: String },
}

/// Ordered key/value properties for one saved sprite.
///
/// Everything is stored as strings, the way level files keep it; typed
/// access goes through `fetch` (lenient) or `retrieve` (strict).
/// Insertion order is preserved so saved levels diff cleanly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a value, replacing an existing key in place.
    pub fn set(&mut self, key: &str, value: impl Display) {
        let value = value.to_string();
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key.to_string(), value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(idx).1)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Parse a value, falling back to `default` when the key is missing
    /// or unparsable. The lenient path for level loading.
    pub fn fetch<T: FromStr>(&self, key: &str, default: T) -> T {
        self.get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Parse a value or say exactly why it could not be parsed.
    pub fn retrieve<T: FromStr>(&self, key: &str) -> Result<T, AttributeError> {
        let value = self
            .get(key)
            .ok_or_else(|| AttributeError::Missing(key.to_string()))?;
        value.parse().map_err(|_| AttributeError::Invalid {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
