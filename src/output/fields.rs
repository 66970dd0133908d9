//! Ordered row type shared by the flattener, filters and renderers

use std::collections::HashMap;

/// One rendered cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValue {
    pub value: String,
    /// Shown when no explicit column selection is requested
    pub default: bool,
}

/// A single output row: field names in first-set order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedFields {
    keys: Vec<String>,
    values: HashMap<String, FieldValue>,
}

impl OrderedFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field. Re-setting an existing name keeps its position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>, default: bool) {
        let name = name.into();
        let field = FieldValue {
            value: value.into(),
            default,
        };

        if !self.values.contains_key(&name) {
            self.keys.push(name.clone());
        }
        self.values.insert(name, field);
    }

    /// Rendered value of a field
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|f| f.value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Iterate fields in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.keys
            .iter()
            .filter_map(|k| self.values.get(k).map(|v| (k.as_str(), v)))
    }

    /// Names flagged as default, in row order
    pub fn default_keys(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, f)| f.default)
            .map(|(k, _)| k.to_string())
            .collect()
    }
}
