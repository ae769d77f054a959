//! `outpost prospect` and `outpost call` commands.

use anyhow::{Context, Result};
use clap::Subcommand;
use sqlx::PgPool;
use uuid::Uuid;

use outpost_core::bulk::bulk_delete;
use outpost_core::import::{self, csv, json, linkedin};
use outpost_core::matching;
use outpost_db::models::{CallOutcome, Disposition, Prospect, ProspectSource, ProspectStatus};
use outpost_db::queries::prospects::NewProspect;
use outpost_db::queries::{call_center, calls, prospects};

#[derive(Subcommand)]
pub enum ProspectCommands {
    /// Add a prospect manually
    Add {
        /// Business name
        name: String,
        /// Country
        #[arg(long)]
        country: Option<String>,
        /// City
        #[arg(long)]
        city: Option<String>,
        /// Comma-separated phone numbers
        #[arg(long)]
        phones: Option<String>,
        /// Comma-separated email addresses
        #[arg(long)]
        emails: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
        /// Free-text notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// List prospects, optionally filtered by status
    List {
        /// Filter: pending, contacted, added_to_crm, archived
        #[arg(long)]
        status: Option<String>,
    },
    /// Import prospects from a file
    Import {
        /// Path to the input file
        file: String,
        /// Input format: json, csv, linkedin
        #[arg(long, default_value = "json")]
        format: String,
    },
    /// Set a prospect's status: pending, contacted, added_to_crm, archived
    SetStatus {
        /// Prospect ID
        id: String,
        /// New status
        status: String,
    },
    /// Copy a prospect and its call history into the call-center collection
    AddToCrm {
        /// Prospect ID
        id: String,
    },
    /// Check a prospect against the call-center collection for duplicates
    Match {
        /// Prospect ID
        id: String,
    },
    /// Delete one or more prospects (continues past individual failures)
    Rm {
        /// Prospect IDs
        ids: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum CallCommands {
    /// Log a call against a prospect
    Log {
        /// Prospect ID
        prospect_id: String,
        /// Outcome: answered, no_answer, busy, voicemail, wrong_number
        outcome: String,
        /// Disposition: interested, callback, not_interested, dead
        disposition: String,
        /// Free-text notes
        #[arg(long)]
        notes: Option<String>,
        /// Extra fields as a JSON object
        #[arg(long)]
        extras: Option<String>,
    },
    /// List the call history for a prospect, newest first
    List {
        /// Prospect ID
        prospect_id: String,
    },
}

fn split_csv_flag(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_prospect_id(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).with_context(|| format!("invalid prospect ID: {s}"))
}

pub async fn run_prospect_command(command: ProspectCommands, pool: &PgPool) -> Result<()> {
    match command {
        ProspectCommands::Add {
            name,
            country,
            city,
            phones,
            emails,
            tags,
            notes,
        } => {
            let new = NewProspect {
                name,
                country,
                city,
                phones: split_csv_flag(phones.as_deref()),
                emails: split_csv_flag(emails.as_deref()),
                tags: split_csv_flag(tags.as_deref()),
                notes,
            };
            let prospect = prospects::insert_prospect(pool, &new, ProspectSource::Manual).await?;
            println!("Prospect {} added ({}).", prospect.name, prospect.id);
        }
        ProspectCommands::List { status } => {
            let status = match status.as_deref() {
                Some(s) => Some(s.parse::<ProspectStatus>().map_err(|e| {
                    anyhow::anyhow!(
                        "{e} (expected pending, contacted, added_to_crm or archived)"
                    )
                })?),
                None => None,
            };
            let list = prospects::list_prospects(pool, status).await?;
            print_prospect_table(&list);
        }
        ProspectCommands::Import { file, format } => {
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {file}"))?;
            let (records, source) = match format.as_str() {
                "json" => (json::parse_prospects(&contents)?, ProspectSource::JsonImport),
                // CSV shares the json_import tag; the source enum predates
                // the CSV path.
                "csv" => (csv::parse_prospects(&contents)?, ProspectSource::JsonImport),
                "linkedin" => (
                    linkedin::parse_prospects(&contents),
                    ProspectSource::LinkedinImport,
                ),
                other => anyhow::bail!("unknown import format: {other} (expected json, csv or linkedin)"),
            };
            let report = import::import_prospects(pool, &records, source).await?;
            println!(
                "Imported {} prospects ({} skipped).",
                report.imported, report.skipped
            );
        }
        ProspectCommands::SetStatus { id, status } => {
            let id = parse_prospect_id(&id)?;
            let status: ProspectStatus = status.parse().map_err(|e| {
                anyhow::anyhow!("{e} (expected pending, contacted, added_to_crm or archived)")
            })?;
            prospects::update_prospect_status(pool, id, status).await?;
            println!("Prospect {id} set to {status}.");
        }
        ProspectCommands::AddToCrm { id } => {
            let id = parse_prospect_id(&id)?;
            let record = call_center::copy_prospect_to_crm(pool, id).await?;
            println!(
                "Prospect copied to the call-center collection as record {}.",
                record.id
            );
        }
        ProspectCommands::Match { id } => {
            let id = parse_prospect_id(&id)?;
            let prospect = prospects::get_prospect(pool, id)
                .await?
                .with_context(|| format!("prospect {id} not found"))?;
            match matching::match_prospect(pool, &prospect.name, &prospect.phones).await? {
                Some(record) => {
                    println!("Duplicate: matches call-center record {} ({}).", record.id, record.name);
                }
                None => println!("No call-center match."),
            }
        }
        ProspectCommands::Rm { ids } => {
            let ids: Vec<Uuid> = ids
                .iter()
                .map(|s| parse_prospect_id(s))
                .collect::<Result<_>>()?;
            let report = bulk_delete(&ids, |id| prospects::delete_prospect(pool, id)).await;
            println!("Deleted {} prospects ({} failed).", report.deleted, report.failed);
        }
    }
    Ok(())
}

pub async fn run_call_command(command: CallCommands, pool: &PgPool) -> Result<()> {
    match command {
        CallCommands::Log {
            prospect_id,
            outcome,
            disposition,
            notes,
            extras,
        } => {
            let prospect_id = parse_prospect_id(&prospect_id)?;
            let outcome: CallOutcome = outcome.parse().map_err(|e| {
                anyhow::anyhow!(
                    "{e} (expected answered, no_answer, busy, voicemail or wrong_number)"
                )
            })?;
            let disposition: Disposition = disposition.parse().map_err(|e| {
                anyhow::anyhow!("{e} (expected interested, callback, not_interested or dead)")
            })?;
            let extras = match extras {
                Some(s) => serde_json::from_str(&s).context("--extras is not valid JSON")?,
                None => serde_json::json!({}),
            };

            let log =
                calls::insert_call_log(pool, prospect_id, outcome, disposition, notes.as_deref(), extras)
                    .await?;
            println!("Call logged ({} / {}) as {}.", log.outcome, log.disposition, log.id);
        }
        CallCommands::List { prospect_id } => {
            let prospect_id = parse_prospect_id(&prospect_id)?;
            let logs = calls::list_calls_for_prospect(pool, prospect_id).await?;
            if logs.is_empty() {
                println!("No calls logged.");
                return Ok(());
            }
            for log in &logs {
                println!(
                    "{}  {} / {}  {}",
                    log.called_at.format("%Y-%m-%d %H:%M"),
                    log.outcome,
                    log.disposition,
                    log.notes.as_deref().unwrap_or("-")
                );
            }
        }
    }
    Ok(())
}

fn print_prospect_table(list: &[Prospect]) {
    if list.is_empty() {
        println!("No prospects found.");
        return;
    }

    println!(
        "{:<38} {:<24} {:<14} {:<16} {:<12}",
        "ID", "NAME", "STATUS", "CITY", "SOURCE"
    );
    println!("{}", "-".repeat(108));
    for p in list {
        println!(
            "{:<38} {:<24} {:<14} {:<16} {:<12}",
            p.id,
            p.name,
            p.status,
            p.city.as_deref().unwrap_or("-"),
            p.source
        );
    }
}
