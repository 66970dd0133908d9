//! Domains command (registrar)

use std::io::Write;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use clap::{Args, Subcommand};
use tracing::debug;

use crate::api::models::Domain;
use crate::api::ApiClient;
use crate::cli::{fetch_each, CommandContext};
use crate::output::{self, render, Format, Outcome, Provider};

#[derive(Args, Debug)]
pub struct DomainsArgs {
    #[command(subcommand)]
    pub command: Option<DomainsCommand>,
}

#[derive(Subcommand, Debug)]
pub enum DomainsCommand {
    /// List all domains
    List,

    /// Show one or more domains
    Show {
        /// Domain IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Wait until a domain is active
    Wait {
        /// Domain ID
        id: String,

        /// Seconds between status checks
        #[arg(long, default_value = "5")]
        interval: u64,

        /// Give up after this many seconds
        #[arg(long, default_value = "300")]
        timeout: u64,
    },

    /// Show raw whois data
    Whois {
        /// Domain name
        name: String,
    },
}

pub async fn execute(ctx: &CommandContext, args: DomainsArgs, outcome: &mut Outcome) -> Result<()> {
    let client = ApiClient::new(&ctx.config)?;

    match args.command.unwrap_or(DomainsCommand::List) {
        DomainsCommand::List => {
            let domains = client.domains().list().await?;
            ctx.render(Provider::from_data(&domains)?)?;
        }

        DomainsCommand::Show { ids } => {
            show(ctx, &client, &ids, &mut std::io::stdout(), outcome).await?
        }

        DomainsCommand::Wait {
            id,
            interval,
            timeout,
        } => {
            let domain = wait_until_active(
                &client,
                &id,
                Duration::from_secs(interval),
                Duration::from_secs(timeout),
            )
            .await?;
            output::success(&format!("Domain {} is {}", domain.name, domain.status));
            ctx.render(Provider::from_data(&domain)?)?;
        }

        DomainsCommand::Whois { name } => {
            let text = client.whois(&name).await?;
            let provider = Provider::from_data(&text)?
                .with_supported_formats(&[Format::Yaml, Format::Json]);
            // whois text is not tabular; anything but json prints it as is
            ctx.output
                .handler(&ctx.config, provider)?
                .with_unsupported_format_handler(|_, provider, out| {
                    render::yaml(out, provider.raw())
                })
                .handle(&mut std::io::stdout())?;
        }
    }

    Ok(())
}

/// Render every domain that could be fetched; report the rest
pub async fn show<W: Write>(
    ctx: &CommandContext,
    client: &ApiClient,
    ids: &[String],
    out: &mut W,
    outcome: &mut Outcome,
) -> Result<()> {
    let domains = fetch_each("domain", ids, outcome, |id| async move {
        client.domains().get(&id).await
    })
    .await;

    if !domains.is_empty() {
        ctx.render_to(Provider::from_data(&domains)?, out)?;
    }
    Ok(())
}

/// Poll until the domain is active. A failed status ends the wait at once.
pub async fn wait_until_active(
    client: &ApiClient,
    id: &str,
    interval: Duration,
    timeout: Duration,
) -> Result<Domain> {
    tokio::time::timeout(timeout, poll_until_active(client, id, interval))
        .await
        .map_err(|_| anyhow!("Timed out after {:?} waiting for domain {}", timeout, id))?
}

async fn poll_until_active(client: &ApiClient, id: &str, interval: Duration) -> Result<Domain> {
    loop {
        let domain = client.domains().get(id).await?;
        match domain.status.as_str() {
            Domain::STATUS_ACTIVE => return Ok(domain),
            Domain::STATUS_FAILED => bail!("Domain {} deployment failed", id),
            status => {
                debug!("Domain {} is {}, checking again in {:?}", id, status, interval);
                tokio::time::sleep(interval).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputArgs;
    use crate::config::Config;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn domain_json(id: u64, name: &str, status: &str) -> serde_json::Value {
        json!({
            "success": true,
            "result": {
                "id": id,
                "name": name,
                "status": status,
                "auto_renew": true,
                "price": 12.5,
                "currency": "EUR",
                "expires_at": "2027-01-31T00:00:00Z",
                "nameservers": ["ns1.example.net", "ns2.example.net"],
                "contact": { "name": "Ops", "email": "ops@example.com", "country": "DE" }
            }
        })
    }

    async fn mount_domain(server: &MockServer, id: u64, name: &str, status: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/domains/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(domain_json(id, name, status)))
            .mount(server)
            .await;
    }

    fn context(uri: &str, output: OutputArgs) -> CommandContext {
        CommandContext {
            config: Config {
                api_key: Some("secret".into()),
                api_url: uri.to_string(),
                ..Config::default()
            },
            output,
        }
    }

    #[tokio::test]
    async fn show_reports_missing_ids_and_renders_the_rest() {
        let server = MockServer::start().await;
        mount_domain(&server, 1, "one.example", "active").await;
        mount_domain(&server, 3, "three.example", "active").await;

        let ctx = context(
            &server.uri(),
            OutputArgs {
                output: Some("csv".into()),
                ..OutputArgs::default()
            },
        );
        let client = ApiClient::new(&ctx.config).unwrap();
        let ids: Vec<String> = ["1", "2", "3"].iter().map(|s| s.to_string()).collect();
        let mut out = Vec::new();
        let mut outcome = Outcome::new();

        show(&ctx, &client, &ids, &mut out, &mut outcome).await.unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,name,status,expires_at\n\
             1,one.example,active,2027-01-31T00:00:00Z\n\
             3,three.example,active,2027-01-31T00:00:00Z\n"
        );
        assert_eq!(outcome.failures().len(), 1);
        assert!(outcome.failures()[0].starts_with("Cannot get domain 2: "));
        assert_eq!(outcome.code(), 1);
    }

    #[tokio::test]
    async fn monetary_and_nested_columns() {
        let server = MockServer::start().await;
        mount_domain(&server, 1, "one.example", "active").await;

        let ctx = context(
            &server.uri(),
            OutputArgs {
                output: Some("list".into()),
                properties: vec!["price".into(), "contact_*".into(), "nameservers".into()],
                ..OutputArgs::default()
            },
        );
        let client = ApiClient::new(&ctx.config).unwrap();
        let mut out = Vec::new();
        let mut outcome = Outcome::new();

        show(&ctx, &client, &["1".to_string()], &mut out, &mut outcome).await.unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "price : 12.50\n\
             nameservers : ns1.example.net, ns2.example.net\n\
             contact_name : Ops\n\
             contact_email : ops@example.com\n\
             contact_country : DE\n"
        );
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn wait_returns_active_domain() {
        let server = MockServer::start().await;
        mount_domain(&server, 7, "seven.example", "active").await;
        let client = ApiClient::new(&context(&server.uri(), OutputArgs::default()).config).unwrap();

        let domain = wait_until_active(&client, "7", Duration::from_millis(10), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(domain.name, "seven.example");
    }

    #[tokio::test]
    async fn wait_aborts_on_failed_status() {
        let server = MockServer::start().await;
        mount_domain(&server, 8, "eight.example", "failed").await;
        let client = ApiClient::new(&context(&server.uri(), OutputArgs::default()).config).unwrap();

        let err = wait_until_active(&client, "8", Duration::from_millis(10), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed"));
    }

    #[tokio::test]
    async fn wait_times_out_while_pending() {
        let server = MockServer::start().await;
        mount_domain(&server, 9, "nine.example", "pending").await;
        let client = ApiClient::new(&context(&server.uri(), OutputArgs::default()).config).unwrap();

        let err = wait_until_active(
            &client,
            "9",
            Duration::from_millis(20),
            Duration::from_millis(200),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().starts_with("Timed out"));
    }
}
