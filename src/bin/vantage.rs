//! Vantage API CLI binary.
//!
//! A command-line interface for interacting with the Vantage API.

use clap::Parser;
use serde::Serialize;
use std::process::ExitCode;
use tabled::{Table, Tabled};
use vantageapi::cli::{Cli, Command, Entity};
use vantageapi::output::PrettyPrint;
use vantageapi::{
    Alert, Dashboard, Delete, Event, Find, Get, SearchCondition, Target, User, VantageClient,
    VantageError,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let client = match VantageClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set VANTAGE_ADDRESS and VANTAGE_API_TOKEN environment variables");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &VantageClient, cli: Cli) -> vantageapi::Result<()> {
    match cli.command {
        Command::Get { entity, id } => handle_get(client, entity, &id, cli.json).await,
        Command::Search {
            entity,
            filters,
            deleted,
        } => handle_search(client, entity, &filters, deleted, cli.json).await,
        Command::Delete { entity, id } => handle_delete(client, entity, &id).await,
    }
}

async fn handle_get(
    client: &VantageClient,
    entity: Entity,
    id: &str,
    json: bool,
) -> vantageapi::Result<()> {
    match entity {
        Entity::Alert => output_single(&Alert::get(client, id).await?, json)?,
        Entity::Dashboard => output_single(&Dashboard::get(client, id).await?, json)?,
        Entity::Event => output_single(&Event::find_by_id(client, id).await?, json)?,
        Entity::User => output_single(&User::get(client, id).await?, json)?,
        Entity::Target => {
            // Targets have no pretty form yet; always print JSON.
            let target = Target::get(client, id).await?;
            println!("{}", serde_json::to_string_pretty(&target)?);
        }
    }
    Ok(())
}

async fn handle_search(
    client: &VantageClient,
    entity: Entity,
    filters: &[String],
    deleted: bool,
    json: bool,
) -> vantageapi::Result<()> {
    let conditions = parse_filters(filters)?;

    match entity {
        Entity::Alert => {
            let alerts = if deleted {
                Alert::find_deleted(client, &conditions).await?
            } else {
                Alert::find(client, &conditions).await?
            };
            output_results(&alerts, json, |a| AlertRow::from(a))?;
        }
        Entity::Dashboard => {
            let dashboards = if deleted {
                Dashboard::find_deleted(client, &conditions).await?
            } else {
                Dashboard::find(client, &conditions).await?
            };
            output_results(&dashboards, json, |d| DashboardRow::from(d))?;
        }
        Entity::Event => {
            if deleted {
                return Err(VantageError::InvalidInput(
                    "events do not support searching the trash".to_string(),
                ));
            }
            let events = Event::find(client, &conditions, None).await?;
            output_results(&events, json, |e| EventRow::from(e))?;
        }
        Entity::User => {
            let users = if deleted {
                User::find_deleted(client, &conditions).await?
            } else {
                User::find(client, &conditions).await?
            };
            output_results(&users, json, |u| UserRow::from(u))?;
        }
        Entity::Target => {
            let targets = if deleted {
                Target::find_deleted(client, &conditions).await?
            } else {
                Target::find(client, &conditions).await?
            };
            output_results(&targets, json, |t| TargetRow::from(t))?;
        }
    }
    Ok(())
}

async fn handle_delete(
    client: &VantageClient,
    entity: Entity,
    id: &str,
) -> vantageapi::Result<()> {
    match entity {
        Entity::Alert => Alert::delete(client, id).await?,
        Entity::Dashboard => Dashboard::delete(client, id).await?,
        Entity::Event => Event::delete(client, id).await?,
        Entity::User => User::delete(client, id).await?,
        Entity::Target => Target::delete(client, id).await?,
    }
    println!("Deleted {id}");
    Ok(())
}

fn parse_filters(filters: &[String]) -> vantageapi::Result<Vec<SearchCondition>> {
    filters
        .iter()
        .map(|raw| {
            raw.split_once('=')
                .map(|(key, value)| SearchCondition::contains(key, value))
                .ok_or_else(|| {
                    VantageError::InvalidInput(format!(
                        "filter must be key=value, got {raw:?}"
                    ))
                })
        })
        .collect()
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> vantageapi::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_results<T, R, F>(items: &[T], json: bool, to_row: F) -> vantageapi::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        println!("\n{} results", items.len());
    }
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct AlertRow {
    id: String,
    name: String,
    severity: String,
    status: String,
}

impl From<&Alert> for AlertRow {
    fn from(a: &Alert) -> Self {
        Self {
            id: a.id.clone().unwrap_or_default(),
            name: a.name.clone(),
            severity: a.severity.clone(),
            status: a.status.join(","),
        }
    }
}

#[derive(Tabled)]
struct DashboardRow {
    id: String,
    name: String,
    tags: String,
}

impl From<&Dashboard> for DashboardRow {
    fn from(d: &Dashboard) -> Self {
        Self {
            id: d.id.clone(),
            name: d.name.clone(),
            tags: d.tags.join(","),
        }
    }
}

#[derive(Tabled)]
struct EventRow {
    id: String,
    name: String,
    severity: String,
    start: i64,
}

impl From<&Event> for EventRow {
    fn from(e: &Event) -> Self {
        Self {
            id: e.id.clone().unwrap_or_default(),
            name: e.name.clone(),
            severity: e.severity.clone(),
            start: e.start_time,
        }
    }
}

#[derive(Tabled)]
struct UserRow {
    id: String,
    customer: String,
    permissions: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.clone().unwrap_or_default(),
            customer: u.customer.clone(),
            permissions: u.permissions.join(","),
        }
    }
}

#[derive(Tabled)]
struct TargetRow {
    id: String,
    title: String,
    method: String,
    recipient: String,
}

impl From<&Target> for TargetRow {
    fn from(t: &Target) -> Self {
        Self {
            id: t.id.clone().unwrap_or_default(),
            title: t.title.clone(),
            method: t.method.clone(),
            recipient: t.recipient.clone(),
        }
    }
}
