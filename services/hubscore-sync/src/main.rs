//! HubScore subscription sync CLI
//!
//! Runs one authenticated HubScore operation and prints the hub's raw JSON
//! answer on stdout. Logs go to stderr as JSON.
//!
//! Usage:
//!   hubscore-sync [--config PATH] subscriptions <category> <email>
//!   hubscore-sync [--config PATH] user-id <category> <email>
//!   hubscore-sync [--config PATH] create-user <category> <email>
//!   hubscore-sync [--config PATH] delete-user <category> <email>
//!   hubscore-sync [--config PATH] update <category> <email> <field=value>...

mod config;

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use hubscore_client::{Category, HubScoreApi};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// One CLI invocation.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Subscriptions { category: Category, email: String },
    UserId { category: Category, email: String },
    CreateUser { category: Category, email: String },
    DeleteUser { category: Category, email: String },
    Update {
        category: Category,
        email: String,
        fields: BTreeMap<String, String>,
    },
}

/// Split `args` (without the program name) into the optional config path
/// and the command.
fn parse_args(args: &[String]) -> Result<(Option<String>, Command)> {
    let mut config_path = None;
    let mut rest = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            let path = iter.next().context("--config requires a path")?;
            config_path = Some(path.clone());
        } else {
            rest.push(arg.as_str());
        }
    }

    let [name, category, email, extra @ ..] = rest.as_slice() else {
        bail!("usage: hubscore-sync [--config PATH] <command> <category> <email> [field=value...]");
    };
    let category: Category = category.parse()?;
    let email = email.to_string();

    let command = match *name {
        "subscriptions" => Command::Subscriptions { category, email },
        "user-id" => Command::UserId { category, email },
        "create-user" => Command::CreateUser { category, email },
        "delete-user" => Command::DeleteUser { category, email },
        "update" => {
            let mut fields = BTreeMap::new();
            for pair in extra {
                let (key, value) = pair
                    .split_once('=')
                    .with_context(|| format!("field must be key=value, got: {pair}"))?;
                fields.insert(key.to_string(), value.to_string());
            }
            if fields.is_empty() {
                bail!("update needs at least one field=value");
            }
            Command::Update {
                category,
                email,
                fields,
            }
        }
        other => bail!("unknown command: {other}"),
    };

    if !extra.is_empty() && !matches!(command, Command::Update { .. }) {
        bail!("unexpected arguments after email: {}", extra.join(" "));
    }

    Ok((config_path, command))
}

async fn run(api: &HubScoreApi, command: Command) -> Result<String> {
    let output = match command {
        Command::Subscriptions { category, email } => {
            api.user_subscriptions(&email, category).await?
        }
        Command::UserId { category, email } => {
            let id = api.user_id(&email, category).await?;
            serde_json::json!({ "id": id }).to_string()
        }
        Command::CreateUser { category, email } => api.create_user(&email, category).await?,
        Command::DeleteUser { category, email } => api.delete_user(&email, category).await?,
        Command::Update {
            category,
            email,
            fields,
        } => api.update_subscriptions(&email, &fields, category).await?,
    };
    Ok(output)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output on stderr and LOG_LEVEL / RUST_LOG support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (cli_config_path, command) = parse_args(&args)?;

    let config_path = Config::resolve_path(cli_config_path.as_deref());
    info!(path = %config_path.display(), "loading configuration");

    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    info!(
        base_url = %config.hubscore.base_url,
        categories = config.hubscore.credentials.len(),
        "configuration loaded"
    );

    let api = HubScoreApi::new(&config.hubscore).context("failed to build HubScore client")?;
    let output = run(&api, command).await?;
    println!("{output}");
    Ok(())
}
