use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

/// A single measured value in the facts tree.
///
/// The page-analysis step emits JSON; every JSON shape maps onto one of
/// these variants so nothing in the input is silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<FactValue>),
    Map(BTreeMap<String, FactValue>),
}

impl FactValue {
    /// Numeric view of the value. Only real numbers qualify: booleans and
    /// numeric-looking strings are not coerced.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FactValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<bool> for FactValue {
    fn from(value: bool) -> Self {
        FactValue::Bool(value)
    }
}

impl From<f64> for FactValue {
    fn from(value: f64) -> Self {
        FactValue::Number(value)
    }
}

impl From<&str> for FactValue {
    fn from(value: &str) -> Self {
        FactValue::Text(value.to_string())
    }
}

/// Extracted page measurements, keyed by name and nested arbitrarily.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Facts {
    root: BTreeMap<String, FactValue>,
}

impl Facts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a dot-delimited path such as `images.altCoverage`.
    ///
    /// Returns `None` when any segment is missing or an intermediate value
    /// is not a map. A present `null` resolves to `Some(FactValue::Null)`.
    pub fn lookup(&self, path: &str) -> Option<&FactValue> {
        if path.is_empty() {
            return None;
        }

        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.root.get(first)?;

        for segment in segments {
            match current {
                FactValue::Map(children) => current = children.get(segment)?,
                _ => return None,
            }
        }

        Some(current)
    }

    /// Set a value at a dot-delimited path, creating intermediate maps.
    /// Any non-map value standing in the way is replaced. Paths that
    /// `lookup` could never resolve (empty, or with an empty segment) are
    /// ignored.
    pub fn insert(&mut self, path: &str, value: impl Into<FactValue>) {
        let segments: Vec<&str> = path.split('.').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return;
        }
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let mut map = &mut self.root;
        for segment in parents {
            let entry = map
                .entry(segment.to_string())
                .or_insert_with(|| FactValue::Map(BTreeMap::new()));
            if !matches!(entry, FactValue::Map(_)) {
                *entry = FactValue::Map(BTreeMap::new());
            }
            let FactValue::Map(children) = entry else {
                return;
            };
            map = children;
        }

        map.insert(last.to_string(), value.into());
    }

    /// Builder-style variant of [`Facts::insert`].
    pub fn with(mut self, path: &str, value: impl Into<FactValue>) -> Self {
        self.insert(path, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Parse facts from a JSON document. The top level must be an object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Facts must be a JSON object")
    }
}

/// Load a facts document produced by the page-analysis step.
pub fn load_facts(path: &Path) -> Result<Facts> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open facts file at {}", path.display()))?;

    let facts: Facts = serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse facts: {} is not a JSON object", path.display()))?;

    Ok(facts)
}
