use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use tracing::info;

use crate::config::DbConfig;

/// Migrations embedded at compile time from `crates/outpost-db/migrations/`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Every table the migrations create, in dependency order.
///
/// Drives the `db-init` and `status` overviews; update when a migration
/// adds a table.
pub const TABLES: [&str; 9] = [
    "accounts",
    "fb_groups",
    "media",
    "templates",
    "weekly_plans",
    "tasks",
    "prospects",
    "call_logs",
    "call_center_records",
];

/// Open a connection pool against the configured database.
///
/// Sized for the serve workload; one-shot CLI commands use a connection or
/// two and close the pool when the command finishes.
pub async fn create_pool(config: &DbConfig) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(8)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await
        .with_context(|| format!("failed to connect to database at {}", config.database_url))
}

/// Run all pending embedded migrations against the pool.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .context("failed to run database migrations")?;

    info!("migrations applied successfully");
    Ok(())
}

/// Ensure the target database exists, creating it if necessary.
///
/// Opens a single connection to the `postgres` maintenance database (same
/// server, same query parameters) and issues `CREATE DATABASE <name>` when
/// the target is absent.
pub async fn ensure_database_exists(config: &DbConfig) -> Result<()> {
    let db_name = config
        .database_name()
        .context("could not determine database name from URL")?;

    // CREATE DATABASE cannot take the name as a bind parameter, so refuse
    // anything that is not a plain identifier.
    if !is_plain_identifier(db_name) {
        anyhow::bail!("database name {db_name:?} contains invalid characters");
    }

    let maintenance_url = config.maintenance_url();
    let mut conn = PgConnection::connect(&maintenance_url)
        .await
        .with_context(|| {
            format!("failed to connect to maintenance database at {maintenance_url}")
        })?;

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(db_name)
            .fetch_one(&mut conn)
            .await
            .context("failed to query pg_database")?;

    if exists {
        info!(db = db_name, "database already exists");
    } else {
        conn.execute(format!("CREATE DATABASE {db_name}").as_str())
            .await
            .with_context(|| format!("failed to create database {db_name}"))?;
        info!(db = db_name, "database created");
    }

    conn.close()
        .await
        .context("failed to close maintenance connection")?;
    Ok(())
}

/// Row counts for every outpost table, in [`TABLES`] order.
pub async fn table_counts(pool: &PgPool) -> Result<Vec<(String, i64)>> {
    let mut counts = Vec::with_capacity(TABLES.len());
    for table in TABLES {
        let query = format!("SELECT COUNT(*) FROM {table}");
        let (count,): (i64,) = sqlx::query_as(&query)
            .fetch_one(pool)
            .await
            .with_context(|| format!("failed to count rows in {table}"))?;
        counts.push((table.to_string(), count));
    }
    Ok(counts)
}

fn is_plain_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}
