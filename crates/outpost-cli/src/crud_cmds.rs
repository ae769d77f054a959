//! `outpost account`, `outpost group` and `outpost template` commands.

use anyhow::{Context, Result};
use clap::Subcommand;
use sqlx::PgPool;
use uuid::Uuid;

use outpost_core::import::{self, csv, json};
use outpost_db::models::AccountStatus;
use outpost_db::queries::groups::NewGroup;
use outpost_db::queries::{accounts, groups, templates};

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Add a posting account
    Add {
        /// Display name
        name: String,
        /// Facebook profile ID
        fb_id: String,
        /// Browser profile tag used by the posting operator
        #[arg(long)]
        browser_tag: Option<String>,
        /// Profile image URL
        #[arg(long)]
        profile_image: Option<String>,
    },
    /// List all accounts
    List,
    /// Set an account's status: active, limited, banned
    SetStatus {
        /// Account ID
        id: String,
        /// New status
        status: String,
    },
    /// Delete an account
    Rm {
        /// Account ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum GroupCommands {
    /// Add a group
    Add {
        /// Group name
        name: String,
        /// Group URL
        url: String,
        /// Member count
        #[arg(long, default_value_t = 0)]
        member_count: i32,
        /// Group language
        #[arg(long)]
        language: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// List all groups
    List,
    /// Record a moderation warning against a group
    Warn {
        /// Group ID
        id: String,
    },
    /// Import groups from a JSON array or CSV file
    Import {
        /// Path to the file
        file: String,
        /// File format
        #[arg(long, default_value = "json", value_parser = ["json", "csv"])]
        format: String,
    },
    /// Delete a group
    Rm {
        /// Group ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum TemplateCommands {
    /// Add a text template
    Add {
        /// Template title
        title: String,
        /// Template body (use - to read from stdin)
        body: String,
    },
    /// List all templates
    List,
    /// Import templates from a JSON array file
    Import {
        /// Path to the JSON file
        file: String,
    },
    /// Delete a template
    Rm {
        /// Template ID
        id: String,
    },
}

fn parse_id(kind: &str, s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).with_context(|| format!("invalid {kind} ID: {s}"))
}

pub async fn run_account_command(command: AccountCommands, pool: &PgPool) -> Result<()> {
    match command {
        AccountCommands::Add {
            name,
            fb_id,
            browser_tag,
            profile_image,
        } => {
            let account = accounts::insert_account(
                pool,
                &name,
                &fb_id,
                browser_tag.as_deref(),
                profile_image.as_deref(),
            )
            .await?;
            println!("Account {} added ({}).", account.name, account.id);
        }
        AccountCommands::List => {
            let list = accounts::list_accounts(pool).await?;
            if list.is_empty() {
                println!("No accounts found.");
                return Ok(());
            }
            println!("{:<38} {:<24} {:<10} {:<12}", "ID", "NAME", "STATUS", "FB ID");
            println!("{}", "-".repeat(86));
            for a in &list {
                println!("{:<38} {:<24} {:<10} {:<12}", a.id, a.name, a.status, a.fb_id);
            }
        }
        AccountCommands::SetStatus { id, status } => {
            let id = parse_id("account", &id)?;
            let status: AccountStatus = status
                .parse()
                .map_err(|e| anyhow::anyhow!("{e} (expected active, limited or banned)"))?;
            accounts::update_account_status(pool, id, status).await?;
            println!("Account {id} set to {status}.");
        }
        AccountCommands::Rm { id } => {
            let id = parse_id("account", &id)?;
            accounts::delete_account(pool, id).await?;
            println!("Account {id} deleted.");
        }
    }
    Ok(())
}

pub async fn run_group_command(command: GroupCommands, pool: &PgPool) -> Result<()> {
    match command {
        GroupCommands::Add {
            name,
            url,
            member_count,
            language,
            tags,
        } => {
            let tags: Vec<String> = tags
                .as_deref()
                .unwrap_or("")
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
            let new = NewGroup {
                name: &name,
                url: &url,
                member_count,
                language: language.as_deref(),
                tags: &tags,
                owner_account_id: None,
            };
            let group = groups::insert_group(pool, &new).await?;
            println!("Group {} added ({}).", group.name, group.id);
        }
        GroupCommands::List => {
            let list = groups::list_groups(pool).await?;
            if list.is_empty() {
                println!("No groups found.");
                return Ok(());
            }
            println!(
                "{:<38} {:<28} {:>8} {:>9}",
                "ID", "NAME", "MEMBERS", "WARNINGS"
            );
            println!("{}", "-".repeat(86));
            for g in &list {
                println!(
                    "{:<38} {:<28} {:>8} {:>9}",
                    g.id, g.name, g.member_count, g.warning_count
                );
            }
        }
        GroupCommands::Warn { id } => {
            let id = parse_id("group", &id)?;
            let count = groups::increment_warning_count(pool, id).await?;
            println!("Group {id} now has {count} warning(s).");
        }
        GroupCommands::Import { file, format } => {
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {file}"))?;
            let records = match format.as_str() {
                "csv" => csv::parse_groups(&contents)?,
                _ => json::parse_groups(&contents)?,
            };
            let report = import::import_groups(pool, &records).await?;
            println!(
                "Imported {} groups ({} skipped).",
                report.imported, report.skipped
            );
        }
        GroupCommands::Rm { id } => {
            let id = parse_id("group", &id)?;
            groups::delete_group(pool, id).await?;
            println!("Group {id} deleted.");
        }
    }
    Ok(())
}

pub async fn run_template_command(command: TemplateCommands, pool: &PgPool) -> Result<()> {
    match command {
        TemplateCommands::Add { title, body } => {
            let body = if body == "-" {
                std::io::read_to_string(std::io::stdin()).context("failed to read stdin")?
            } else {
                body
            };
            let template = templates::insert_template(pool, &title, &body).await?;
            println!("Template {} added ({}).", template.title, template.id);
        }
        TemplateCommands::List => {
            let list = templates::list_templates(pool).await?;
            if list.is_empty() {
                println!("No templates found.");
                return Ok(());
            }
            for t in &list {
                let preview: String = t.body.chars().take(60).collect();
                let ellipsis = if t.body.chars().count() > 60 { "..." } else { "" };
                println!("{}  {}\n    {preview}{ellipsis}", t.id, t.title);
            }
        }
        TemplateCommands::Import { file } => {
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {file}"))?;
            let records = json::parse_templates(&contents)?;
            let report = import::import_templates(pool, &records).await?;
            println!(
                "Imported {} templates ({} skipped).",
                report.imported, report.skipped
            );
        }
        TemplateCommands::Rm { id } => {
            let id = parse_id("template", &id)?;
            templates::delete_template(pool, id).await?;
            println!("Template {id} deleted.");
        }
    }
    Ok(())
}
