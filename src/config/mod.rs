//! Configuration management
//!
//! Settings come from the selected context of the YAML context file, then
//! environment variables (`.env` is loaded first) override them.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::output::Format;

pub const DEFAULT_API_URL: &str = "https://api.edgectl.example/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PER_PAGE: u32 = 100;
const DEFAULT_CONTEXT: &str = "default";

/// Resolved configuration for one invocation
#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the context the settings came from
    pub context: String,

    /// API key sent with every request
    pub api_key: Option<String>,

    /// Base URL of the REST API
    pub api_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Page size for list requests
    pub per_page: u32,

    /// Output format used when `--output` is absent
    pub output_format: Format,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            context: DEFAULT_CONTEXT.to_string(),
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            per_page: DEFAULT_PER_PAGE,
            output_format: Format::Table,
        }
    }
}

/// One named context in the context file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

/// The persisted context file (`config.yaml`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_context: Option<String>,
    #[serde(default)]
    pub contexts: BTreeMap<String, ContextSettings>,
}

impl ContextFile {
    /// A missing file is an empty configuration
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_yaml::to_string(self)?)
            .with_context(|| format!("Cannot write config file {}", path.display()))
    }

    /// Make `name` the current context
    pub fn use_context(&mut self, name: &str) -> Result<()> {
        if !self.contexts.contains_key(name) {
            let known: Vec<&str> = self.contexts.keys().map(|k| k.as_str()).collect();
            return Err(anyhow!(
                "Unknown context '{}'. Known contexts: {}",
                name,
                if known.is_empty() { "none".to_string() } else { known.join(", ") }
            ));
        }
        self.current_context = Some(name.to_string());
        Ok(())
    }
}

impl Config {
    /// Load configuration from the context file and environment variables
    pub fn load(context: Option<&str>) -> Result<Self> {
        let file = ContextFile::load(&Self::config_file()?)?;
        Self::from_sources(&file, context, |key| env::var(key).ok())
    }

    /// Merge the context file with environment lookups.
    ///
    /// Context precedence: `context` argument, `EDGE_CONTEXT`, the file's
    /// current context, then `default`. Naming a context that does not
    /// exist is an error; the implicit fallback is not.
    pub fn from_sources<F>(file: &ContextFile, context: Option<&str>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit = context.map(str::to_string).or_else(|| env("EDGE_CONTEXT"));
        let name = explicit
            .clone()
            .or_else(|| file.current_context.clone())
            .unwrap_or_else(|| DEFAULT_CONTEXT.to_string());

        let settings = match file.contexts.get(&name) {
            Some(settings) => settings.clone(),
            None if explicit.is_some() => {
                return Err(anyhow!("Context '{}' not found in config file", name));
            }
            None => ContextSettings::default(),
        };

        let timeout_secs = match env("EDGE_TIMEOUT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| anyhow!("EDGE_TIMEOUT must be a number of seconds, got '{}'", raw))?,
            None => settings.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            context: name,
            api_key: env("EDGE_API_KEY").or(settings.api_key),
            api_url: env("EDGE_API_URL")
                .or(settings.api_url)
                .unwrap_or_else(|| DEFAULT_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout_secs,
            per_page: settings.per_page.unwrap_or(DEFAULT_PER_PAGE).max(1),
            output_format: env("EDGE_OUTPUT")
                .map(|f| Format::parse(&f))
                .unwrap_or_default(),
        })
    }

    /// The API key, or an error explaining how to set one
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            anyhow!(
                "Authentication required. Set EDGE_API_KEY or add api_key to context '{}'",
                self.context
            )
        })
    }

    /// Get config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Cannot determine config directory"))?
            .join("edgectl");

        Ok(dir)
    }

    /// Path of the YAML context file
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.yaml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn file() -> ContextFile {
        let mut contexts = BTreeMap::new();
        contexts.insert(
            "prod".to_string(),
            ContextSettings {
                api_key: Some("prod-key".into()),
                api_url: Some("https://prod.example/v1/".into()),
                timeout_secs: Some(10),
                per_page: Some(50),
            },
        );
        contexts.insert("staging".to_string(), ContextSettings::default());
        ContextFile {
            current_context: Some("prod".into()),
            contexts,
        }
    }

    fn env_of(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn current_context_settings() {
        let config = Config::from_sources(&file(), None, env_of(&[])).unwrap();

        assert_eq!(config.context, "prod");
        assert_eq!(config.api_key.as_deref(), Some("prod-key"));
        assert_eq!(config.api_url, "https://prod.example/v1");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.per_page, 50);
        assert_eq!(config.output_format, Format::Table);
    }

    #[test]
    fn environment_overrides_file() {
        let env = env_of(&[
            ("EDGE_API_KEY", "env-key"),
            ("EDGE_TIMEOUT", "3"),
            ("EDGE_OUTPUT", "json"),
        ]);
        let config = Config::from_sources(&file(), None, env).unwrap();

        assert_eq!(config.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.output_format, Format::Json);
    }

    #[test]
    fn explicit_context_selection() {
        let config = Config::from_sources(&file(), Some("staging"), env_of(&[])).unwrap();
        assert_eq!(config.context, "staging");
        assert!(config.require_api_key().is_err());
        assert_eq!(config.api_url, DEFAULT_API_URL);

        let env = env_of(&[("EDGE_CONTEXT", "missing")]);
        assert!(Config::from_sources(&file(), None, env).is_err());
    }

    #[test]
    fn empty_file_falls_back_to_defaults() {
        let config = Config::from_sources(&ContextFile::default(), None, env_of(&[])).unwrap();
        assert_eq!(config.context, "default");
        assert_eq!(config.per_page, 100);
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let env = env_of(&[("EDGE_TIMEOUT", "soon")]);
        assert!(Config::from_sources(&file(), None, env).is_err());
    }

    #[test]
    fn context_file_round_trip_and_switch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        assert_eq!(ContextFile::load(&path).unwrap(), ContextFile::default());

        let mut contexts = file();
        contexts.use_context("staging").unwrap();
        contexts.save(&path).unwrap();

        let loaded = ContextFile::load(&path).unwrap();
        assert_eq!(loaded.current_context.as_deref(), Some("staging"));
        assert_eq!(loaded, contexts);

        assert!(contexts.use_context("nope").is_err());
    }
}
