//! `jrnl` - Main Entry Point
//!
//! Terminal front end for the composer: manage webhook targets and send
//! messages to one channel or to all of them.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;

use jrnl_client::commands::compose::{self, SendResponse};
use jrnl_client::commands::webhooks::{self, AddWebhookRequest, UpdateWebhookRequest};
use jrnl_client::{AppState, Config};

#[derive(Parser)]
#[command(name = "jrnl", version, about = "Send messages to Discord webhooks")]
struct Cli {
    /// Directory holding the webhook list (overrides JRNL_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List configured webhooks
    List,
    /// Add a webhook
    Add { name: String, url: String },
    /// Change a webhook's name or URL
    Update {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        url: Option<String>,
    },
    /// Remove webhooks by their list number
    Remove {
        #[arg(required = true)]
        numbers: Vec<usize>,
    },
    /// Send one message
    Send {
        /// Webhook id; sends to every webhook when omitted
        #[arg(long)]
        to: Option<Uuid>,
        #[arg(required = true, trailing_var_arg = true)]
        message: Vec<String>,
    },
    /// Compose interactively, one message per line
    Compose {
        /// Webhook id to start on; starts on the first webhook when omitted
        #[arg(long)]
        to: Option<Uuid>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    let _sentry_guard = jrnl_client::init_sentry(&config);
    jrnl_client::init_logging();

    tracing::debug!(data_dir = %config.data_dir.display(), "jrnl starting");
    let state = AppState::new(&config)?;

    match cli.command {
        Command::List => print_webhooks(&state),
        Command::Add { name, url } => {
            let target = webhooks::add_webhook(
                &state,
                AddWebhookRequest {
                    name,
                    endpoint: url,
                },
            )
            .await
            .map_err(anyhow::Error::msg)?;
            println!("Added #{} ({})", target.name, target.id);
        }
        Command::Update { id, name, url } => {
            let target = webhooks::update_webhook(
                &state,
                UpdateWebhookRequest {
                    id,
                    name,
                    endpoint: url,
                },
            )
            .await
            .map_err(anyhow::Error::msg)?;
            println!("Updated #{} ({})", target.name, target.id);
        }
        Command::Remove { numbers } => {
            let count = webhooks::get_webhooks(&state).len();
            let mut positions = Vec::with_capacity(numbers.len());
            for number in numbers {
                if number == 0 || number > count {
                    bail!("No webhook number {number}");
                }
                positions.push(number - 1);
            }
            let removed = webhooks::delete_webhooks(&state, positions).await;
            println!("Removed {removed} webhook(s)");
        }
        Command::Send { to, message } => {
            let response = compose::send_message(&state, message.join(" "), to)
                .await
                .map_err(anyhow::Error::msg)?;
            print_response(&response);
            if !response.result.is_delivered() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Compose { to } => {
            let selection = webhooks::start_compose(&state, to)
                .await
                .map_err(anyhow::Error::msg)?;
            compose_loop(&state, &selection.label).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_webhooks(state: &AppState) {
    let targets = webhooks::get_webhooks(state);
    if targets.is_empty() {
        println!("No webhooks configured. Add one with `jrnl add <name> <url>`.");
        return;
    }
    for (i, target) in targets.iter().enumerate() {
        println!("{:>3}. #{:<24} {}", i + 1, target.name, target.id);
    }
}

fn print_response(response: &SendResponse) {
    if response.result.is_delivered() {
        println!("{}", response.summary);
    } else {
        eprintln!("{}", response.summary);
    }
}

const COMPOSE_HELP: &str =
    "Commands: /next, /prev, /all, /<number>, /list, /help, /quit. Anything else is sent.";

async fn compose_loop(state: &AppState, label: &str) -> Result<()> {
    println!("Composing to {label}. {COMPOSE_HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some(command) = line.strip_prefix('/') else {
            match compose::send_to_selection(state, line.to_string()).await {
                Ok(response) => print_response(&response),
                Err(e) => eprintln!("Failed to send message: {e}"),
            }
            continue;
        };

        let selection = match command {
            "quit" | "q" => break,
            "help" => {
                println!("{COMPOSE_HELP}");
                continue;
            }
            "list" => {
                print_webhooks(state);
                continue;
            }
            "next" | "n" => webhooks::select_next_webhook(state).await,
            "prev" | "p" => webhooks::select_previous_webhook(state).await,
            "all" => webhooks::select_all_webhooks(state).await,
            other => match other.parse::<usize>() {
                Ok(number) => match webhooks::select_webhook_number(state, number).await {
                    Ok(selection) => selection,
                    Err(e) => {
                        eprintln!("{e}");
                        continue;
                    }
                },
                Err(_) => {
                    eprintln!("Unknown command /{other}. {COMPOSE_HELP}");
                    continue;
                }
            },
        };
        println!("Composing to {}", selection.label);
    }

    Ok(())
}
