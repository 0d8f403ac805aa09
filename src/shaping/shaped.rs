//! Shaped (narrowed) results

use crate::core::field::FieldValue;
use crate::shaping::selection::FieldSelection;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An ordered map from canonical field name to value
///
/// Serializes as a JSON object whose keys keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapedResult(IndexMap<String, FieldValue>);

impl ShapedResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of a field
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    /// Field names, in output order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Narrow an already shaped result again
    ///
    /// Keeps the selected fields that are present, in selection order. With
    /// [`FieldSelection::All`] the result is returned unchanged, so shaping
    /// twice with the same selection is a no-op.
    pub fn reshape(&self, selection: &FieldSelection) -> ShapedResult {
        match selection {
            FieldSelection::All => self.clone(),
            FieldSelection::Only(fields) => fields
                .iter()
                .filter_map(|field| {
                    self.0
                        .get(*field)
                        .map(|value| (field.to_string(), value.clone()))
                })
                .collect(),
        }
    }

    pub fn into_inner(self) -> IndexMap<String, FieldValue> {
        self.0
    }
}

impl FromIterator<(String, FieldValue)> for ShapedResult {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ShapedResult {
    type Item = (String, FieldValue);
    type IntoIter = indexmap::map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
