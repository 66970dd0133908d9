//! Non-table renderers

use std::io::Write;

use minijinja::{Environment, UndefinedBehavior};
use serde_json::Value;
use serde_json_path::JsonPath;

use super::columns::ColumnSelection;
use super::error::OutputError;
use super::fields::OrderedFields;

/// Header of resolved names, then one record per row. Explicit columns
/// keep the order they were requested in.
pub fn csv<W: Write + ?Sized>(
    out: &mut W,
    selection: &ColumnSelection,
    rows: &[OrderedFields],
) -> Result<(), OutputError> {
    let Some(first) = rows.first() else {
        return Ok(());
    };

    let columns = selection.resolve_in_request_order(first);
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(&columns)?;
    for row in rows {
        writer.write_record(columns.iter().map(|c| row.value(c).unwrap_or_default()))?;
    }
    writer.flush()?;
    Ok(())
}

/// `<name> : <value>` per column
pub fn list<W: Write + ?Sized>(
    out: &mut W,
    selection: &ColumnSelection,
    rows: &[OrderedFields],
) -> Result<(), OutputError> {
    for row in rows {
        for column in selection.resolve(row) {
            writeln!(out, "{} : {}", column, row.value(&column).unwrap_or_default())?;
        }
    }
    Ok(())
}

/// Raw values, space separated, one line per row
pub fn values<W: Write + ?Sized>(
    out: &mut W,
    selection: &ColumnSelection,
    rows: &[OrderedFields],
) -> Result<(), OutputError> {
    for row in rows {
        let line: Vec<&str> = selection
            .resolve(row)
            .iter()
            .map(|c| row.value(c).unwrap_or_default())
            .collect();
        writeln!(out, "{}", line.join(" "))?;
    }
    Ok(())
}

pub fn json<W: Write + ?Sized>(out: &mut W, raw: &Value) -> Result<(), OutputError> {
    writeln!(out, "{}", serde_json::to_string_pretty(raw)?)?;
    Ok(())
}

/// Accepts RFC 9535 paths (`$.name`) and the kubectl form (`{.name}`)
pub fn normalize_jsonpath(expr: &str) -> String {
    let expr = expr.trim();
    let expr = expr
        .strip_prefix('{')
        .and_then(|e| e.strip_suffix('}'))
        .unwrap_or(expr)
        .trim();

    if expr.starts_with('$') {
        expr.to_string()
    } else if expr.starts_with('.') || expr.starts_with('[') {
        format!("${}", expr)
    } else {
        format!("$.{}", expr)
    }
}

pub fn jsonpath<W: Write + ?Sized>(out: &mut W, raw: &Value, expr: &str) -> Result<(), OutputError> {
    let normalized = normalize_jsonpath(expr);
    let path = JsonPath::parse(&normalized).map_err(|e| OutputError::JsonPath {
        expr: expr.to_string(),
        reason: e.to_string(),
    })?;

    let nodes: Vec<String> = path
        .query(raw)
        .all()
        .into_iter()
        .map(|node| match node {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();

    writeln!(out, "{}", nodes.join(" "))?;
    Ok(())
}

/// Render once per element of a sequence, or once for a single value.
/// Fields of an object are top-level template variables; referencing a
/// missing one is an error.
pub fn template<W: Write + ?Sized>(out: &mut W, raw: &Value, source: &str) -> Result<(), OutputError> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);

    let items: Vec<&Value> = match raw {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    for item in items {
        let rendered = env.render_str(source, minijinja::Value::from_serialize(item))?;
        out.write_all(rendered.as_bytes())?;
        if !rendered.ends_with('\n') {
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Text passes through untouched; structured data is encoded as YAML
pub fn yaml<W: Write + ?Sized>(out: &mut W, raw: &Value) -> Result<(), OutputError> {
    let text = match raw {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)?,
    };
    out.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        writeln!(out)?;
    }
    Ok(())
}
