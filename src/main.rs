//! whd - command-line client for SolarWinds Web Help Desk
//!
//! # Configuration
//!
//! Set the following environment variables (or use a `.env` file):
//!
//! - `WHD_BASE_URL`: server root, e.g. `https://helpdesk.example.com`
//! - `WHD_API_KEY`: technician API key, or
//! - `WHD_USERNAME` with `WHD_PASSWORD` or `WHD_SESSION_KEY`
//!
//! # Usage
//!
//! ```bash
//! whd ticket 1234
//! whd tickets --qualifier "(statustype.statusTypeName = 'Open')" --json
//! whd note 1234 "Replaced the toner" --hidden
//! whd upload --ticket 1234 ./screenshot.png --delete-after
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use whd::cli::{Cli, Commands, ListKind};
use whd::{Config, ListQuery, WhdClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore errors if not found)
    dotenvy::dotenv().ok();

    // stdout is reserved for command output
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("whd=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::debug!("Configuration loaded, base_url: {}", config.base_url);

    let client = WhdClient::new(&config).context("Failed to create WHD client")?;

    run(&client, cli).await
}

async fn run(client: &WhdClient, cli: Cli) -> Result<()> {
    let json = cli.json;

    match cli.command {
        Commands::Session => {
            let key = client.get_session_key().await.context("Failed to open session")?;
            client
                .terminate_session(&key)
                .await
                .context("Failed to terminate session")?;
            emit(json, &serde_json::json!({"sessionKey": key, "terminated": true}), || {
                println!("Session {} opened and terminated", key);
            })?;
        }

        Commands::Ticket { id } => {
            let ticket = client.get_ticket(id).await?;
            let url = client.ticket_web_url(id)?;
            emit(json, &ticket, || {
                println!("#{} {}", id, ticket.display_subject());
                if let Some(status) = ticket.status_type.as_ref().and_then(|s| s.id) {
                    println!("Status:   #{}", status);
                }
                if let Some(location) = &ticket.location {
                    println!("Location: {}", location.display_name());
                }
                println!("Link:     {}", url);
                if let Some(detail) = &ticket.detail {
                    println!();
                    println!("{}", detail);
                }
            })?;
        }

        Commands::Tickets { qualifier, limit, page } => {
            let query = ListQuery::new(qualifier).with_limit(limit).with_page(page);
            let tickets = client.get_tickets(&query).await?;
            emit(json, &tickets, || {
                for ticket in &tickets {
                    println!("#{:<8} {}", display_id(ticket.id), ticket.display_subject());
                }
                println!("{} ticket(s) on page {}", tickets.len(), query.page());
            })?;
        }

        Commands::Notes { ticket } => {
            let notes = client.get_notes(ticket).await?;
            emit(json, &notes, || {
                for note in &notes {
                    let hidden = if note.is_hidden { " (hidden)" } else { "" };
                    println!("- [{}]{} {}", display_id(note.id), hidden, note.display_text());
                }
            })?;
        }

        Commands::Note { ticket, text, hidden } => {
            let id = if hidden {
                client.create_hidden_note(ticket, &text).await?
            } else {
                client.create_note(ticket, &text).await?
            };
            emit(json, &serde_json::json!({"id": id}), || {
                println!("Created note {} on ticket {}", id, ticket);
            })?;
        }

        Commands::Asset { number } => {
            let assets = client.get_asset(&number).await?;
            emit(json, &assets, || {
                for asset in &assets {
                    let location = asset
                        .location
                        .as_ref()
                        .map(|l| l.display_name())
                        .unwrap_or("-");
                    println!(
                        "[{}] {} @ {}",
                        display_id(asset.id),
                        asset.display_number(),
                        location
                    );
                }
            })?;
        }

        Commands::Location { id } => {
            let location = client.get_location(id).await?;
            emit(json, &location, || {
                println!("[{}] {}", id, location.display_name());
                for cf in &location.custom_fields {
                    println!("  {}: {}", display_id(cf.id), cf.value);
                }
            })?;
        }

        Commands::Lists { kind } => {
            if kind == ListKind::RequestTypes {
                let types = sorted(client.get_request_type_list().await?);
                emit(json, &types, || print_map(&types))?;
            } else {
                let names = sorted(fetch_name_list(client, kind).await?);
                emit(json, &names, || print_map(&names))?;
            }
        }

        Commands::Attachment { id, out, base64 } => {
            if base64 {
                let encoded = client.get_attachment_as_base64(id).await?;
                emit(json, &serde_json::json!({"id": id, "base64": encoded}), || {
                    println!("{}", encoded);
                })?;
            } else {
                let data = client.get_attachment(id).await?;
                let path = out.unwrap_or_else(|| PathBuf::from(format!("attachment-{}", id)));
                tokio::fs::write(&path, &data)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                let saved = serde_json::json!({
                    "id": id,
                    "path": path.display().to_string(),
                    "bytes": data.len(),
                });
                emit(json, &saved, || {
                    println!("Saved {} bytes to {}", data.len(), path.display());
                })?;
            }
        }

        Commands::Upload { ticket, note, path, name, delete_after } => {
            let file_name = match name {
                Some(name) => name,
                None => path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .with_context(|| format!("{} has no file name", path.display()))?,
            };

            let id = match (ticket, note) {
                (Some(ticket), _) => {
                    client
                        .upload_attachment_to_ticket_from_file(
                            ticket,
                            &file_name,
                            &path,
                            delete_after,
                        )
                        .await?
                }
                (None, Some(note)) => {
                    client
                        .upload_attachment_to_note_from_file(note, &file_name, &path, delete_after)
                        .await?
                }
                (None, None) => anyhow::bail!("either --ticket or --note is required"),
            };

            emit(json, &serde_json::json!({"id": id, "fileName": file_name}), || {
                println!("Uploaded {} as attachment {}", file_name, id);
            })?;
        }
    }

    Ok(())
}

async fn fetch_name_list(client: &WhdClient, kind: ListKind) -> Result<HashMap<u64, String>> {
    let names = match kind {
        ListKind::StatusTypes => client.get_status_type_list().await?,
        ListKind::PriorityTypes => client.get_priority_type_list().await?,
        ListKind::Techs => client.get_tech_list().await?,
        ListKind::Locations => client.get_location_list().await?,
        ListKind::CustomFields => client.get_custom_field_list().await?,
        ListKind::LocationCustomFields => client.get_location_custom_field_list().await?,
        ListKind::AssetCustomFields => client.get_asset_custom_field_list().await?,
        ListKind::RequestTypes => anyhow::bail!("request types are not a name list"),
    };
    Ok(names)
}

/// Prints `value` as pretty JSON, or runs `human` for plain output.
fn emit<T: Serialize>(json: bool, value: &T, human: impl FnOnce()) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        human();
    }
    Ok(())
}

fn sorted<V>(map: HashMap<u64, V>) -> BTreeMap<u64, V> {
    map.into_iter().collect()
}

fn print_map<V: Display>(map: &BTreeMap<u64, V>) {
    for (id, value) in map {
        println!("{:>6}  {}", id, value);
    }
}

fn display_id(id: Option<u64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())
}
