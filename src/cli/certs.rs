//! SSL certificates command

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use serde_json::Value;

use crate::api::models::Certificate;
use crate::api::ApiClient;
use crate::cli::{fetch_each, CommandContext};
use crate::output::{OrderedFields, Outcome, Provider};

const EXPIRY_COLUMN: &str = "validity_not_after";

#[derive(Args, Debug)]
pub struct CertsArgs {
    #[command(subcommand)]
    pub command: Option<CertsCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CertsCommand {
    /// List certificates
    List,

    /// Show one or more certificates
    Show {
        /// Certificate IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

pub async fn execute(ctx: &CommandContext, args: CertsArgs, outcome: &mut Outcome) -> Result<()> {
    let client = ApiClient::new(&ctx.config)?;

    let certs = match args.command.unwrap_or(CertsCommand::List) {
        CertsCommand::List => client.certificates().list().await?,
        CertsCommand::Show { ids } => {
            fetch_each("certificate", &ids, outcome, |id| {
                let client = &client;
                async move { client.certificates().get(&id).await }
            })
            .await
        }
    };

    if !certs.is_empty() {
        ctx.render(provider(&certs, Utc::now())?)?;
    }
    Ok(())
}

/// Certificates plus a computed `days_left` column next to the expiry
pub fn provider(certs: &[Certificate], now: DateTime<Utc>) -> Result<Provider> {
    let provider = Provider::from_data(certs)?.with_handler(
        EXPIRY_COLUMN,
        move |row: &mut OrderedFields, name: &str, value: &Value| {
            let expiry = value.as_str().unwrap_or("null");
            row.set(name, expiry, true);
            let days = days_left(expiry, now)
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string());
            row.set("days_left", days, true);
        },
    );
    Ok(provider)
}

/// Whole days until `expiry` (RFC 3339); negative once expired
pub fn days_left(expiry: &str, now: DateTime<Utc>) -> Option<i64> {
    DateTime::parse_from_rfc3339(expiry)
        .ok()
        .map(|at| (at.with_timezone(&Utc) - now).num_days())
}
