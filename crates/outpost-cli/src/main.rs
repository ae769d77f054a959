mod config;
mod crud_cmds;
mod media_cmds;
mod plan_cmds;
mod prospect_cmds;
mod serve_cmd;
mod status_cmd;

use clap::{Parser, Subcommand};

use outpost_db::pool;

use config::OutpostConfig;

#[derive(Parser)]
#[command(name = "outpost", about = "Group-posting marketing operations backend")]
struct Cli {
    /// Database URL (overrides OUTPOST_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write an outpost config file (no database required)
    Init {
        /// PostgreSQL connection URL
        #[arg(long, default_value = "postgresql://localhost:5432/outpost")]
        db_url: String,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Initialize the outpost database (create + migrate)
    DbInit,
    /// Posting account management
    Account {
        #[command(subcommand)]
        command: crud_cmds::AccountCommands,
    },
    /// Facebook group management
    Group {
        #[command(subcommand)]
        command: crud_cmds::GroupCommands,
    },
    /// Text template management
    Template {
        #[command(subcommand)]
        command: crud_cmds::TemplateCommands,
    },
    /// Media library management
    Media {
        #[command(subcommand)]
        command: media_cmds::MediaCommands,
    },
    /// Weekly plan management
    Plan {
        #[command(subcommand)]
        command: plan_cmds::PlanCommands,
    },
    /// Task management within the active plan
    Task {
        #[command(subcommand)]
        command: plan_cmds::TaskCommands,
    },
    /// Prospect pipeline management
    Prospect {
        #[command(subcommand)]
        command: prospect_cmds::ProspectCommands,
    },
    /// Call logging against prospects
    Call {
        #[command(subcommand)]
        command: prospect_cmds::CallCommands,
    },
    /// Show database overview and active plan progress
    Status,
    /// Run the HTTP JSON API
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        /// Port to listen on
        #[arg(long, default_value_t = 8700)]
        port: u16,
    },
}

/// Execute the `outpost init` command: write config file.
fn cmd_init(db_url: &str, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.to_string(),
        },
        storage: config::StorageSection::default(),
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url = {db_url}");
    println!("  storage.media_dir = {}", cfg.storage.media_dir.display());
    println!();
    println!("Next: run `outpost db-init` to create and migrate the database.");

    Ok(())
}

/// Execute the `outpost db-init` command: create database and run migrations.
async fn cmd_db_init(cli_db_url: Option<&str>) -> anyhow::Result<()> {
    let resolved = OutpostConfig::resolve(cli_db_url)?;

    println!("Initializing outpost database...");

    pool::ensure_database_exists(&resolved.db_config).await?;

    let db_pool = pool::create_pool(&resolved.db_config).await?;
    pool::run_migrations(&db_pool).await?;

    let counts = pool::table_counts(&db_pool).await?;
    println!("Database ready. Tables:");
    for (table, count) in &counts {
        println!("  {table}: {count} rows");
    }

    db_pool.close().await;

    println!("outpost db-init complete.");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { db_url, force } => {
            cmd_init(&db_url, force)?;
        }
        Commands::DbInit => {
            cmd_db_init(cli.database_url.as_deref()).await?;
        }
        Commands::Account { command } => {
            let resolved = OutpostConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = crud_cmds::run_account_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
        Commands::Group { command } => {
            let resolved = OutpostConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = crud_cmds::run_group_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
        Commands::Template { command } => {
            let resolved = OutpostConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = crud_cmds::run_template_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
        Commands::Media { command } => {
            let resolved = OutpostConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = media_cmds::run_media_command(command, &db_pool, &resolved.media_dir).await;
            db_pool.close().await;
            result?;
        }
        Commands::Plan { command } => {
            let resolved = OutpostConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = plan_cmds::run_plan_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
        Commands::Task { command } => {
            let resolved = OutpostConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = plan_cmds::run_task_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
        Commands::Prospect { command } => {
            let resolved = OutpostConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = prospect_cmds::run_prospect_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
        Commands::Call { command } => {
            let resolved = OutpostConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = prospect_cmds::run_call_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
        Commands::Status => {
            let resolved = OutpostConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = status_cmd::run_status(&db_pool).await;
            db_pool.close().await;
            result?;
        }
        Commands::Serve { bind, port } => {
            let resolved = OutpostConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = serve_cmd::run_serve(db_pool.clone(), &bind, port).await;
            db_pool.close().await;
            result?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod test_util {
    use std::sync::{Mutex, MutexGuard, OnceLock};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    /// Serialize tests that mutate process environment variables.
    pub fn lock_env() -> MutexGuard<'static, ()> {
        ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }
}
