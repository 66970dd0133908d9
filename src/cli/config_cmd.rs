//! Config command

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::CommandContext;
use crate::config::{Config, ContextFile};
use crate::output::{self, OrderedFields, OutputError, Provider, Renderable};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show config paths
    Paths,

    /// Switch the current context
    Use {
        /// Context name from the config file
        name: String,
    },
}

/// What `config show` prints. The API key itself is never included.
#[derive(Debug, Serialize)]
pub struct ConfigSummary {
    pub context: String,
    pub auth: &'static str,
    pub api_url: String,
    pub timeout_secs: u64,
    pub per_page: u32,
    pub output: String,
}

impl From<&Config> for ConfigSummary {
    fn from(config: &Config) -> Self {
        Self {
            context: config.context.clone(),
            auth: if config.api_key.is_some() { "set" } else { "not set" },
            api_url: config.api_url.clone(),
            timeout_secs: config.timeout_secs,
            per_page: config.per_page,
            output: config.output_format.to_string(),
        }
    }
}

impl Renderable for ConfigSummary {
    fn default_columns() -> &'static [&'static str] {
        &["context", "auth", "api_url", "timeout_secs", "per_page", "output"]
    }
}

/// Locations edgectl reads settings from
#[derive(Debug, Serialize)]
pub struct ConfigPaths {
    pub config_dir: String,
    pub config_file: String,
    pub env_file: &'static str,
}

impl ConfigPaths {
    fn current() -> Result<Self> {
        Ok(Self {
            config_dir: Config::config_dir()?.display().to_string(),
            config_file: Config::config_file()?.display().to_string(),
            env_file: ".env (current directory)",
        })
    }

    /// One `name`/`path` row per location rather than one wide row
    pub fn provider(&self) -> Result<Provider, OutputError> {
        Provider::from_fields(self, |raw| {
            let Some(entries) = raw.as_object() else {
                return Ok(Vec::new());
            };
            Ok(entries
                .iter()
                .map(|(name, path)| {
                    let mut row = OrderedFields::new();
                    row.set("name", name.as_str(), true);
                    row.set("path", path.as_str().unwrap_or_default(), true);
                    row
                })
                .collect())
        })
    }
}

pub async fn execute(ctx: &CommandContext, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Show => {
            if ctx.config.api_key.is_none() {
                output::warning("Auth: not configured");
            }
            ctx.render(Provider::from_data(&ConfigSummary::from(&ctx.config))?)?;
        }

        ConfigCommand::Paths => {
            ctx.render(ConfigPaths::current()?.provider()?)?;
        }

        ConfigCommand::Use { name } => {
            let path = Config::config_file()?;
            let mut file = ContextFile::load(&path)?;
            file.use_context(&name)?;
            file.save(&path)?;
            output::success(&format!("Switched to context '{}'", name));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputArgs;
    use pretty_assertions::assert_eq;

    #[test]
    fn summary_hides_the_key() {
        let ctx = CommandContext {
            config: Config {
                context: "prod".into(),
                api_key: Some("s3cr3t".into()),
                ..Config::default()
            },
            output: OutputArgs {
                output: Some("list".into()),
                ..OutputArgs::default()
            },
        };
        let mut out = Vec::new();
        ctx.render_to(
            Provider::from_data(&ConfigSummary::from(&ctx.config)).unwrap(),
            &mut out,
        )
        .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("context : prod\nauth : set\n"));
        assert!(!out.contains("s3cr3t"));
    }

    #[test]
    fn paths_render_one_row_per_location() {
        let paths = ConfigPaths {
            config_dir: "/home/ops/.config/edgectl".into(),
            config_file: "/home/ops/.config/edgectl/config.yaml".into(),
            env_file: ".env (current directory)",
        };
        let ctx = CommandContext {
            config: Config::default(),
            output: OutputArgs {
                output: Some("csv".into()),
                ..OutputArgs::default()
            },
        };
        let mut out = Vec::new();
        ctx.render_to(paths.provider().unwrap(), &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "name,path\n\
             config_dir,/home/ops/.config/edgectl\n\
             config_file,/home/ops/.config/edgectl/config.yaml\n\
             env_file,.env (current directory)\n"
        );
    }

    #[test]
    fn summary_table_shows_declared_columns() {
        let ctx = CommandContext {
            config: Config::default(),
            output: OutputArgs::default(),
        };
        let mut out = Vec::new();
        ctx.render_to(
            Provider::from_data(&ConfigSummary::from(&ctx.config)).unwrap(),
            &mut out,
        )
        .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("| CONTEXT | AUTH    | API URL"));
        assert!(out.contains("| default | not set |"));
    }

    #[test]
    fn summary_without_key() {
        let summary = ConfigSummary::from(&Config::default());
        assert_eq!(summary.auth, "not set");
        assert_eq!(summary.output, "table");
    }
}
