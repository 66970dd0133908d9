//! edgectl - command line client for hosted DDoS protection, SSL,
//! registrar and storage services.
//!
//! Every command renders through the same output engine, so `-o`,
//! `-p`, `--filter` and friends work everywhere.

mod api;
mod cli;
mod config;
mod output;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, CommandContext, Commands};
use crate::config::Config;
use crate::output::Outcome;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr; stdout carries rendered output only
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    match run(cli).await {
        Ok(outcome) => {
            if !outcome.is_success() {
                debug!(failures = outcome.failures().len(), "finished with errors");
            }
            outcome.exit_code()
        }
        Err(err) => {
            output::error(&format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<Outcome> {
    let config = Config::load(cli.context.as_deref())?;
    let ctx = CommandContext {
        config,
        output: cli.output,
    };
    let mut outcome = Outcome::new();

    match cli.command {
        Commands::Domains(args) => cli::domains::execute(&ctx, args, &mut outcome).await?,
        Commands::Certs(args) => cli::certs::execute(&ctx, args, &mut outcome).await?,
        Commands::Protection(args) => cli::protection::execute(&ctx, args, &mut outcome).await?,
        Commands::Storage(args) => cli::storage::execute(&ctx, args, &mut outcome).await?,
        Commands::Config(args) => cli::config_cmd::execute(&ctx, args).await?,
    }

    Ok(outcome)
}
