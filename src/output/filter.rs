//! Client-side row filters (`--filter status=active`)

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::columns::glob_match;
use super::error::OutputError;
use super::fields::OrderedFields;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Equals
    Eq,
    /// Not equals
    Neq,
    /// Like (glob)
    Lk,
    /// Not like
    Nlk,
    /// Greater than
    Gt,
    /// Less than
    Lt,
    /// Equals any
    In,
    /// Equals none
    Nin,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operator::Eq => "EQ",
            Operator::Neq => "NEQ",
            Operator::Lk => "LK",
            Operator::Nlk => "NLK",
            Operator::Gt => "GT",
            Operator::Lt => "LT",
            Operator::In => "IN",
            Operator::Nin => "NIN",
        };
        f.write_str(name)
    }
}

/// Longest tokens first so `!=` is not read as `=`
const OPERATOR_TOKENS: [(&str, Operator); 6] = [
    ("!=", Operator::Neq),
    ("!~", Operator::Nlk),
    ("=", Operator::Eq),
    ("~", Operator::Lk),
    (">", Operator::Gt),
    ("<", Operator::Lt),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub property: String,
    pub operator: Operator,
    pub values: Vec<String>,
}

impl Filter {
    pub fn new(property: impl Into<String>, operator: Operator, values: Vec<String>) -> Self {
        Self {
            property: property.into(),
            operator,
            values,
        }
    }

    pub fn matches(&self, row: &OrderedFields) -> bool {
        matches_filter(row, self)
    }
}

impl FromStr for Filter {
    type Err = OutputError;

    /// `<property><op><value>` with op one of `= != ~ !~ > <`.
    /// A bracketed list (`status=[active,pending]`) turns `=` into IN and
    /// `!=` into NIN.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| OutputError::InvalidFlagValue {
            flag: "filter",
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let (index, token, operator) = s
            .char_indices()
            .find_map(|(i, _)| {
                OPERATOR_TOKENS
                    .iter()
                    .find(|(token, _)| s[i..].starts_with(token))
                    .map(|(token, op)| (i, *token, *op))
            })
            .ok_or_else(|| invalid("expected one of = != ~ !~ > <"))?;

        let property = s[..index].trim();
        let raw = s[index + token.len()..].trim();

        if property.is_empty() {
            return Err(invalid("missing property name"));
        }
        if raw.is_empty() {
            return Err(invalid("missing value"));
        }

        if let Some(list) = raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            let operator = match operator {
                Operator::Eq => Operator::In,
                Operator::Neq => Operator::Nin,
                _ => return Err(invalid("lists are only allowed with = and !=")),
            };
            let values: Vec<String> = list
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect();
            if values.is_empty() {
                return Err(invalid("empty value list"));
            }
            return Ok(Filter::new(property, operator, values));
        }

        Ok(Filter::new(property, operator, vec![raw.to_string()]))
    }
}

/// Every filter must match. No filters match everything.
pub fn matches_filters(row: &OrderedFields, filters: &[Filter]) -> bool {
    filters.iter().all(|f| f.matches(row))
}

/// A row missing the property never matches
pub fn matches_filter(row: &OrderedFields, filter: &Filter) -> bool {
    row.value(&filter.property)
        .map(|actual| compare_values(actual, filter.operator, &filter.values))
        .unwrap_or(false)
}

pub fn compare_values(actual: &str, operator: Operator, expected: &[String]) -> bool {
    let Some(first) = expected.first() else {
        return false;
    };

    match operator {
        Operator::Eq => equal_fold(actual, first),
        Operator::Neq => !equal_fold(actual, first),
        Operator::Lk => glob_match(first, actual),
        Operator::Nlk => !glob_match(first, actual),
        Operator::Gt => compare_ordered(actual, first) == Ordering::Greater,
        Operator::Lt => compare_ordered(actual, first) == Ordering::Less,
        Operator::In => expected.iter().any(|e| equal_fold(actual, e)),
        Operator::Nin => !expected.iter().any(|e| equal_fold(actual, e)),
    }
}

/// Numeric when both sides parse as f64, otherwise case-insensitive text
pub fn compare_ordered(actual: &str, expected: &str) -> Ordering {
    match (actual.trim().parse::<f64>(), expected.trim().parse::<f64>()) {
        (Ok(a), Ok(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        _ => actual.to_lowercase().cmp(&expected.to_lowercase()),
    }
}

fn equal_fold(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
