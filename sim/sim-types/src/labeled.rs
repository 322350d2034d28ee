//! Insertion-ordered mapping from string keys to scalar values.

use hashbrown::HashMap;
use nalgebra::Vector3;

use crate::labels::{AXES, vector_key};
use crate::{Result, SimError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Named scalar quantities shared between generators.
///
/// Iteration follows insertion order, which is also the column order used
/// when the history is exported. Overwriting a key keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "Vec<(String, f64)>", into = "Vec<(String, f64)>")
)]
pub struct LabeledState {
    entries: Vec<(String, f64)>,
    index: HashMap<String, usize>,
}

impl LabeledState {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no key is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::MissingKey`] if the key is absent.
    pub fn get(&self, key: &str) -> Result<f64> {
        self.index
            .get(key)
            .map(|&i| self.entries[i].1)
            .ok_or_else(|| SimError::missing_key(key))
    }

    /// Value stored under `key`, if any.
    #[must_use]
    pub fn get_opt(&self, key: &str) -> Option<f64> {
        self.index.get(key).map(|&i| self.entries[i].1)
    }

    /// The three components of a vector quantity.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::MissingKey`] for the first absent component.
    pub fn get_vector(&self, quantity: &str, owner: &str) -> Result<Vector3<f64>> {
        let mut out = Vector3::zeros();
        for axis in AXES {
            out[axis.index()] = self.get(&vector_key(quantity, axis, owner))?;
        }
        Ok(out)
    }

    /// Store `value` under `key`, appending new keys at the end.
    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        let key = key.into();
        if let Some(&i) = self.index.get(&key) {
            self.entries[i].1 = value;
        } else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key, value));
        }
    }

    /// Store the three components of a vector quantity.
    pub fn insert_vector(&mut self, quantity: &str, owner: &str, value: &Vector3<f64>) {
        for axis in AXES {
            self.insert(vector_key(quantity, axis, owner), value[axis.index()]);
        }
    }

    /// Merge a partial mapping, overwriting existing keys and never removing
    /// others.
    pub fn set<K, I>(&mut self, partial: I)
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, f64)>,
    {
        for (key, value) in partial {
            self.insert(key, value);
        }
    }

    /// Every label of `required` that is absent, in the order given.
    #[must_use]
    pub fn missing<'a, I>(&self, required: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut missing: Vec<String> = Vec::new();
        for label in required {
            if !self.contains(label) && !missing.iter().any(|m| m == label) {
                missing.push(label.to_string());
            }
        }
        missing
    }

    /// Keys and values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for LabeledState {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut state = Self::new();
        state.set(iter);
        state
    }
}

impl<K: Into<String>> Extend<(K, f64)> for LabeledState {
    fn extend<I: IntoIterator<Item = (K, f64)>>(&mut self, iter: I) {
        self.set(iter);
    }
}

impl From<Vec<(String, f64)>> for LabeledState {
    fn from(entries: Vec<(String, f64)>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<LabeledState> for Vec<(String, f64)> {
    fn from(state: LabeledState) -> Self {
        state.entries
    }
}
