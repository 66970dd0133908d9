//! CLI commands module

pub mod certs;
pub mod config_cmd;
pub mod domains;
pub mod protection;
pub mod storage;

use std::fmt::Display;
use std::future::Future;
use std::io::Write;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::output::{Filter, Format, FormatOptions, Outcome, OutputError, OutputHandler, Provider};

/// edgectl - hosted services CLI
#[derive(Parser, Debug)]
#[command(name = "edgectl")]
#[command(version)]
#[command(about = "DDoS protection, SSL, registrar and storage from the command line", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration context to use
    #[arg(long, global = true)]
    pub context: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Registrar domains
    Domains(domains::DomainsArgs),

    /// SSL certificates
    Certs(certs::CertsArgs),

    /// DDoS protection and WAF resources
    Protection(protection::ProtectionArgs),

    /// Object storage buckets
    Storage(storage::StorageArgs),

    /// Configuration management
    Config(config_cmd::ConfigArgs),
}

/// Flags consumed by the output engine
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output format: table, csv, list, value, json, jsonpath, template, yaml
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Column to show; repeatable, `*` wildcards allowed
    #[arg(short, long = "property", global = true)]
    pub properties: Vec<String>,

    /// Extra column added to the selection; repeatable
    #[arg(long = "column", global = true)]
    pub columns: Vec<String>,

    /// JSONPath expression for `-o jsonpath`
    #[arg(long, global = true)]
    pub jsonpath: Option<String>,

    /// Template for `-o template`, e.g. '{{ name }} {{ status }}'
    #[arg(long, global = true)]
    pub template: Option<String>,

    /// Row filter `<property><op><value>`, op one of = != ~ !~ > <; repeatable
    #[arg(long = "filter", global = true)]
    pub filters: Vec<String>,
}

impl OutputArgs {
    /// `--output`, else the configured default
    pub fn format(&self, config: &Config) -> Format {
        self.output
            .as_deref()
            .map(Format::parse)
            .unwrap_or_else(|| config.output_format.clone())
    }

    pub fn options(&self) -> Result<FormatOptions, OutputError> {
        let filters = self
            .filters
            .iter()
            .map(|f| f.parse::<Filter>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FormatOptions {
            properties: self.properties.clone(),
            template: self.template.clone(),
            jsonpath: self.jsonpath.clone(),
            filters,
        })
    }

    pub fn handler(&self, config: &Config, provider: Provider) -> Result<OutputHandler, OutputError> {
        Ok(OutputHandler::new(self.format(config), provider)
            .with_options(self.options()?)
            .with_additional_columns(self.columns.clone()))
    }
}

/// Everything a command needs besides its own arguments
pub struct CommandContext {
    pub config: Config,
    pub output: OutputArgs,
}

impl CommandContext {
    /// Render `provider` to stdout
    pub fn render(&self, provider: Provider) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        self.render_to(provider, &mut stdout)
    }

    pub fn render_to<W: Write>(&self, provider: Provider, out: &mut W) -> Result<()> {
        self.output.handler(&self.config, provider)?.handle(out)?;
        Ok(())
    }
}

/// Fetch each id in order. Failures are reported on `outcome` and do not
/// stop the remaining ids.
pub async fn fetch_each<T, E, F, Fut>(
    kind: &str,
    ids: &[String],
    outcome: &mut Outcome,
    fetch: F,
) -> Vec<T>
where
    E: Display,
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut found = Vec::with_capacity(ids.len());
    for id in ids {
        match fetch(id.clone()).await {
            Ok(item) => found.push(item),
            Err(err) => outcome.report(format!("Cannot get {} {}: {}", kind, id, err)),
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::filter::Operator;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_global_output_flags() {
        let cli = Cli::try_parse_from([
            "edgectl",
            "domains",
            "list",
            "-o",
            "csv",
            "-p",
            "name",
            "--property",
            "contact_*",
            "--column",
            "price",
            "--filter",
            "status=active",
        ])
        .unwrap();

        assert_eq!(cli.output.output.as_deref(), Some("csv"));
        assert_eq!(cli.output.properties, vec!["name", "contact_*"]);
        assert_eq!(cli.output.columns, vec!["price"]);

        let options = cli.output.options().unwrap();
        assert_eq!(options.filters[0].operator, Operator::Eq);
        assert_eq!(cli.output.format(&Config::default()), Format::Csv);
    }

    #[test]
    fn format_defaults_to_config() {
        let config = Config {
            output_format: Format::Json,
            ..Config::default()
        };
        assert_eq!(OutputArgs::default().format(&config), Format::Json);
        assert_eq!(OutputArgs::default().format(&Config::default()), Format::Table);
    }

    #[test]
    fn malformed_filter_is_invalid_flag_value() {
        let args = OutputArgs {
            filters: vec!["status".into()],
            ..OutputArgs::default()
        };
        assert!(matches!(
            args.options().unwrap_err(),
            OutputError::InvalidFlagValue { flag: "filter", .. }
        ));
    }

    #[tokio::test]
    async fn fetch_each_keeps_going() {
        let ids: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let mut outcome = Outcome::new();

        let found = fetch_each("thing", &ids, &mut outcome, |id| async move {
            if id == "b" {
                Err("not found")
            } else {
                Ok(id)
            }
        })
        .await;

        assert_eq!(found, vec!["a", "c"]);
        assert_eq!(outcome.failures(), ["Cannot get thing b: not found"]);
        assert_eq!(outcome.code(), 1);
    }
}
