//! Object storage command

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::ApiClient;
use crate::cli::{fetch_each, CommandContext};
use crate::output::{Outcome, Provider};

#[derive(Args, Debug)]
pub struct StorageArgs {
    #[command(subcommand)]
    pub command: Option<StorageCommand>,
}

#[derive(Subcommand, Debug)]
pub enum StorageCommand {
    /// List buckets
    List,

    /// Show one or more buckets
    Show {
        /// Bucket IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

pub async fn execute(ctx: &CommandContext, args: StorageArgs, outcome: &mut Outcome) -> Result<()> {
    let client = ApiClient::new(&ctx.config)?;

    let buckets = match args.command.unwrap_or(StorageCommand::List) {
        StorageCommand::List => client.buckets().list().await?,
        StorageCommand::Show { ids } => {
            fetch_each("bucket", &ids, outcome, |id| {
                let client = &client;
                async move { client.buckets().get(&id).await }
            })
            .await
        }
    };

    if !buckets.is_empty() {
        ctx.render(Provider::from_data(&buckets)?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::Bucket;
    use crate::cli::OutputArgs;
    use crate::config::Config;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn bucket() -> Bucket {
        serde_json::from_value(json!({
            "id": 5,
            "name": "backups",
            "location": "fra1",
            "type": "standard",
            "size_bytes": 1048576,
            "objects": 12,
            "monthly_cost": 3.4,
            "created_at": "2026-01-02T03:04:05Z",
            "credentials": { "access_key": "AK", "secret_key": "SK" }
        }))
        .unwrap()
    }

    fn render(output: OutputArgs) -> String {
        let ctx = CommandContext {
            config: Config::default(),
            output,
        };
        let mut out = Vec::new();
        ctx.render_to(Provider::from_data(&vec![bucket()]).unwrap(), &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn table_uses_declared_defaults() {
        let expected = "\
+----+---------+----------+----------+------------+
| ID | NAME    | LOCATION | TYPE     | SIZE BYTES |
+----+---------+----------+----------+------------+
| 5  | backups | fra1     | standard | 1048576    |
+----+---------+----------+----------+------------+
";
        assert_eq!(render(OutputArgs::default()), expected);
    }

    #[test]
    fn credentials_never_become_columns() {
        let out = render(OutputArgs {
            output: Some("list".into()),
            properties: vec!["*".into()],
            ..OutputArgs::default()
        });

        assert!(out.contains("monthly_cost : 3.40\n"));
        assert!(!out.contains("secret"));
        assert!(!out.contains("access_key"));
    }

    #[test]
    fn json_keeps_the_raw_record() {
        let out = render(OutputArgs {
            output: Some("json".into()),
            ..OutputArgs::default()
        });
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["credentials"]["access_key"], "AK");
    }
}
