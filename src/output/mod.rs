//! Output formatting module
//!
//! Records are flattened into [`OrderedFields`] rows, narrowed by filters
//! and column selection, then rendered by [`OutputHandler`] in the format
//! requested with `--output`.

pub mod columns;
pub mod error;
pub mod fields;
pub mod filter;
pub mod flatten;
pub mod handler;
pub mod outcome;
pub mod provider;
pub mod render;
pub mod table;

use owo_colors::OwoColorize;

pub use error::OutputError;
pub use fields::OrderedFields;
pub use filter::Filter;
pub use handler::{Format, FormatOptions, OutputHandler};
pub use outcome::Outcome;
pub use provider::{Provider, Renderable};

/// Print success message
pub fn success(msg: &str) {
    eprintln!("{} {}", "✓".green().bold(), msg);
}

/// Print error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

/// Print warning message
pub fn warning(msg: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), msg);
}
