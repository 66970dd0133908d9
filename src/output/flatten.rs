//! Flatten serialized records into output rows
//!
//! Records are serialized with serde first, so column names follow the
//! serialized field names (`#[serde(rename)]` wins over the identifier).
//! Nested structs become `<parent>_<child>` columns, `#[serde(flatten)]`
//! members contribute without a prefix.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

use super::fields::OrderedFields;

/// Custom per-column conversion. Receives the row being built, the full
/// column name and the raw value, and sets whatever it wants on the row.
pub type FieldHandler = Box<dyn Fn(&mut OrderedFields, &str, &Value)>;

/// Column name used when a record serializes to a bare scalar
pub const SCALAR_COLUMN: &str = "value";

#[derive(Default)]
pub struct Flattener {
    default_fields: HashSet<String>,
    ignored_fields: HashSet<String>,
    monetary_fields: HashSet<String>,
    handlers: HashMap<String, FieldHandler>,
}

impl Flattener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_fields.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_ignored_fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_fields.extend(names.into_iter().map(Into::into));
        self
    }

    /// Floats in these columns render with 2 decimals instead of 6
    pub fn with_monetary_fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.monetary_fields.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_handler<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut OrderedFields, &str, &Value) + 'static,
    {
        self.handlers.insert(name.into(), Box::new(handler));
        self
    }

    pub fn is_default(&self, name: &str) -> bool {
        self.default_fields.contains(name)
    }

    /// Produce one row per record. Sequences are flattened element by
    /// element; `null` yields no rows.
    pub fn flatten(&self, value: &Value) -> Vec<OrderedFields> {
        match value {
            Value::Array(items) => items.iter().flat_map(|item| self.flatten(item)).collect(),
            Value::Object(map) => {
                let mut row = OrderedFields::new();
                self.flatten_object(&mut row, "", map);
                vec![row]
            }
            Value::Null => Vec::new(),
            scalar => {
                let mut row = OrderedFields::new();
                self.set_field(&mut row, SCALAR_COLUMN, scalar);
                vec![row]
            }
        }
    }

    fn flatten_object(&self, row: &mut OrderedFields, prefix: &str, map: &Map<String, Value>) {
        for (key, value) in map {
            let name = format!("{}{}", prefix, key);

            if let Some(handler) = self.handlers.get(&name) {
                handler(row, &name, value);
                continue;
            }
            if self.ignored_fields.contains(&name) {
                continue;
            }

            match value {
                Value::Object(child) => self.flatten_object(row, &format!("{}_", name), child),
                _ => self.set_field(row, &name, value),
            }
        }
    }

    fn set_field(&self, row: &mut OrderedFields, name: &str, value: &Value) {
        let rendered = self.render_scalar(name, value);
        row.set(name, rendered, self.is_default(name));
    }

    /// Canonical string form of a leaf value
    pub fn render_scalar(&self, name: &str, value: &Value) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::String(s) => s.clone(),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    i.to_string()
                } else if let Some(u) = n.as_u64() {
                    u.to_string()
                } else {
                    let f = n.as_f64().unwrap_or_default();
                    if self.monetary_fields.contains(name) {
                        format!("{:.2}", f)
                    } else {
                        format!("{:.6}", f)
                    }
                }
            }
            Value::Array(items) if items.iter().all(is_scalar) => items
                .iter()
                .map(|item| self.render_scalar(name, item))
                .collect::<Vec<_>>()
                .join(", "),
            other => other.to_string(),
        }
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}
