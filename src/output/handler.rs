//! Format selection and dispatch

use std::fmt;
use std::io::Write;

use tracing::debug;

use super::columns::ColumnSelection;
use super::error::OutputError;
use super::fields::OrderedFields;
use super::filter::{matches_filters, Filter};
use super::provider::Provider;
use super::{render, table};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Table,
    Csv,
    List,
    Value,
    Json,
    JsonPath,
    Template,
    Yaml,
    /// Anything else; rendered as a table after a warning
    Other(String),
}

impl Format {
    /// Lenient parse: empty means table, unknown names are kept as `Other`
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "" | "table" => Format::Table,
            "csv" => Format::Csv,
            "list" => Format::List,
            "value" => Format::Value,
            "json" => Format::Json,
            "jsonpath" => Format::JsonPath,
            "template" => Format::Template,
            "yaml" => Format::Yaml,
            other => Format::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Format::Table => "table",
            Format::Csv => "csv",
            Format::List => "list",
            Format::Value => "value",
            Format::Json => "json",
            Format::JsonPath => "jsonpath",
            Format::Template => "template",
            Format::Yaml => "yaml",
            Format::Other(name) => name,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for Format {
    fn from(name: &str) -> Self {
        Format::parse(name)
    }
}

/// Per-invocation rendering options
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    /// `--property` patterns
    pub properties: Vec<String>,
    /// `--template`, required by the template format
    pub template: Option<String>,
    /// `--jsonpath`, required by the jsonpath format
    pub jsonpath: Option<String>,
    /// Applied to rows before row-based rendering
    pub filters: Vec<Filter>,
}

/// Called instead of failing when the provider does not support the format
pub type UnsupportedFormatHandler =
    Box<dyn Fn(&Format, &Provider, &mut dyn Write) -> Result<(), OutputError>>;

pub struct OutputHandler {
    format: Format,
    provider: Provider,
    options: FormatOptions,
    additional_columns: Vec<String>,
    unsupported: Option<UnsupportedFormatHandler>,
}

impl OutputHandler {
    pub fn new(format: Format, provider: Provider) -> Self {
        Self {
            format,
            provider,
            options: FormatOptions::default(),
            additional_columns: Vec::new(),
            unsupported: None,
        }
    }

    pub fn with_options(mut self, options: FormatOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_additional_columns(mut self, columns: Vec<String>) -> Self {
        self.additional_columns = columns;
        self
    }

    pub fn with_unsupported_format_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Format, &Provider, &mut dyn Write) -> Result<(), OutputError> + 'static,
    {
        self.unsupported = Some(Box::new(handler));
        self
    }

    pub fn handle<W: Write>(&self, out: &mut W) -> Result<(), OutputError> {
        if let Some(supported) = self.provider.supported_formats() {
            if !supported.contains(&self.format) {
                return match &self.unsupported {
                    Some(fallback) => fallback(&self.format, &self.provider, out),
                    None => Err(OutputError::UnsupportedFormat {
                        format: self.format.to_string(),
                        supported: supported.iter().map(|f| f.to_string()).collect(),
                    }),
                };
            }
        }

        let raw = self.provider.raw();
        match &self.format {
            Format::Json => render::json(out, raw),
            Format::Yaml => render::yaml(out, raw),
            Format::JsonPath => {
                let expr = self.options.jsonpath.as_deref().ok_or(OutputError::MissingOption {
                    format: "jsonpath",
                    flag: "jsonpath",
                })?;
                render::jsonpath(out, raw, expr)
            }
            Format::Template => {
                let source = self.options.template.as_deref().ok_or(OutputError::MissingOption {
                    format: "template",
                    flag: "template",
                })?;
                render::template(out, raw, source)
            }
            Format::Value => render::values(out, &self.selection(), &self.rows()?),
            Format::Csv => render::csv(out, &self.selection(), &self.rows()?),
            Format::List => render::list(out, &self.selection(), &self.rows()?),
            Format::Other(name) => {
                debug!(format = %name, "unknown output format, using table");
                super::warning(&format!("Unknown output format '{}', using table", name));
                Ok(table::render(out, &self.selection(), &self.rows()?)?)
            }
            Format::Table => Ok(table::render(out, &self.selection(), &self.rows()?)?),
        }
    }

    fn selection(&self) -> ColumnSelection {
        ColumnSelection {
            requested: self.options.properties.clone(),
            additional: self.additional_columns.clone(),
            declared_defaults: self.provider.default_columns().to_vec(),
        }
    }

    fn rows(&self) -> Result<Vec<OrderedFields>, OutputError> {
        let mut rows = self.provider.field_data()?;
        if !self.options.filters.is_empty() {
            rows.retain(|row| matches_filters(row, &self.options.filters));
        }
        Ok(rows)
    }
}
