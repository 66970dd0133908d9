//! Column selection: `--property` globs, default columns and extra columns

use regex::RegexBuilder;

use super::fields::OrderedFields;

/// Case-insensitive match where `*` matches any run of characters.
/// Every other character is literal.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    if pattern == "*" {
        return true;
    }
    if !pattern.contains('*') {
        return pattern.to_lowercase() == text.to_lowercase();
    }

    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");

    RegexBuilder::new(&format!("^{}$", body))
        .case_insensitive(true)
        .build()
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

/// Row keys matched by any of the patterns, in row order, each once
pub fn select_columns(patterns: &[String], row: &OrderedFields) -> Vec<String> {
    row.keys()
        .iter()
        .filter(|key| patterns.iter().any(|p| glob_match(p, key)))
        .cloned()
        .collect()
}

/// Columns to show for `row` when `requested` may be empty.
///
/// With no request, a non-empty `declared_defaults` list wins over the
/// per-field default flags. Otherwise exactly the flagged fields are
/// returned, which may be none.
pub fn columns_or_default(
    requested: &[String],
    row: &OrderedFields,
    declared_defaults: &[String],
) -> Vec<String> {
    if !requested.is_empty() {
        return select_columns(requested, row);
    }

    if !declared_defaults.is_empty() {
        return declared_defaults
            .iter()
            .filter(|name| row.contains(name))
            .cloned()
            .collect();
    }

    row.default_keys()
}

/// What the caller asked for, resolved lazily against each row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSelection {
    /// `--property` patterns
    pub requested: Vec<String>,
    /// Extra columns unioned into the selection
    pub additional: Vec<String>,
    /// Declared by the record type; replaces per-field default flags
    pub declared_defaults: Vec<String>,
}

impl ColumnSelection {
    #[cfg(test)]
    pub fn new(requested: Vec<String>) -> Self {
        Self {
            requested,
            ..Self::default()
        }
    }

    pub fn resolve(&self, row: &OrderedFields) -> Vec<String> {
        if self.additional.is_empty() {
            return columns_or_default(&self.requested, row, &self.declared_defaults);
        }

        if self.requested.is_empty() {
            let mut columns = columns_or_default(&[], row, &self.declared_defaults);
            for extra in select_columns(&self.additional, row) {
                if !columns.contains(&extra) {
                    columns.push(extra);
                }
            }
            return columns;
        }

        let mut patterns = self.requested.clone();
        patterns.extend(self.additional.iter().cloned());
        select_columns(&patterns, row)
    }

    /// Like [`resolve`](Self::resolve), but explicit patterns keep the
    /// order they were given in. A glob expands in row order at its
    /// position.
    pub fn resolve_in_request_order(&self, row: &OrderedFields) -> Vec<String> {
        if self.requested.is_empty() {
            return self.resolve(row);
        }

        let mut columns: Vec<String> = Vec::new();
        for pattern in self.requested.iter().chain(&self.additional) {
            for name in select_columns(std::slice::from_ref(pattern), row) {
                if !columns.contains(&name) {
                    columns.push(name);
                }
            }
        }
        columns
    }
}
