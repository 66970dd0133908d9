//! DDoS protection / WAF command

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::ApiClient;
use crate::cli::{fetch_each, CommandContext};
use crate::output::{Outcome, Provider};

#[derive(Args, Debug)]
pub struct ProtectionArgs {
    #[command(subcommand)]
    pub command: Option<ProtectionCommand>,
}

#[derive(Subcommand, Debug)]
pub enum ProtectionCommand {
    /// List protected resources
    List,

    /// Show one or more protected resources
    Show {
        /// Resource IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

pub async fn execute(
    ctx: &CommandContext,
    args: ProtectionArgs,
    outcome: &mut Outcome,
) -> Result<()> {
    let client = ApiClient::new(&ctx.config)?;

    let resources = match args.command.unwrap_or(ProtectionCommand::List) {
        ProtectionCommand::List => client.protection().list().await?,
        ProtectionCommand::Show { ids } => {
            fetch_each("protected resource", &ids, outcome, |id| {
                let client = &client;
                async move { client.protection().get(&id).await }
            })
            .await
        }
    };

    if !resources.is_empty() {
        ctx.render(Provider::from_data(&resources)?)?;
    }
    Ok(())
}
