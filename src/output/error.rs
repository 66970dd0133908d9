//! Output engine errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("unsupported output format '{format}', supported formats: {}", supported.join(", "))]
    UnsupportedFormat {
        format: String,
        supported: Vec<String>,
    },

    #[error("invalid value '{value}' for --{flag}: {reason}")]
    InvalidFlagValue {
        flag: &'static str,
        value: String,
        reason: String,
    },

    #[error("output format '{format}' requires --{flag}")]
    MissingOption {
        format: &'static str,
        flag: &'static str,
    },

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSONPath '{expr}': {reason}")]
    JsonPath { expr: String, reason: String },

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
