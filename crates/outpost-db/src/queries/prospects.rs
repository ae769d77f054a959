//! Database query functions for the `prospects` table.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Prospect, ProspectSource, ProspectStatus};

/// Fields for a new prospect row.
#[derive(Debug, Clone, Default)]
pub struct NewProspect {
    pub name: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub phones: Vec<String>,
    pub emails: Vec<String>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
}

/// Insert a new prospect row. Returns the inserted prospect.
pub async fn insert_prospect(
    pool: &PgPool,
    new: &NewProspect,
    source: ProspectSource,
) -> Result<Prospect> {
    let prospect = sqlx::query_as::<_, Prospect>(
        "INSERT INTO prospects (name, country, city, phones, emails, tags, notes, source) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING *",
    )
    .bind(&new.name)
    .bind(new.country.as_deref())
    .bind(new.city.as_deref())
    .bind(&new.phones)
    .bind(&new.emails)
    .bind(&new.tags)
    .bind(new.notes.as_deref())
    .bind(source)
    .fetch_one(pool)
    .await
    .context("failed to insert prospect")?;

    Ok(prospect)
}

/// Fetch a prospect by its ID.
pub async fn get_prospect(pool: &PgPool, id: Uuid) -> Result<Option<Prospect>> {
    let prospect = sqlx::query_as::<_, Prospect>("SELECT * FROM prospects WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch prospect")?;

    Ok(prospect)
}

/// List prospects, optionally filtered by status, newest first.
pub async fn list_prospects(
    pool: &PgPool,
    status: Option<ProspectStatus>,
) -> Result<Vec<Prospect>> {
    let prospects = match status {
        Some(s) => {
            sqlx::query_as::<_, Prospect>(
                "SELECT * FROM prospects WHERE status = $1 ORDER BY created_at DESC",
            )
            .bind(s)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Prospect>("SELECT * FROM prospects ORDER BY created_at DESC")
                .fetch_all(pool)
                .await
        }
    }
    .context("failed to list prospects")?;

    Ok(prospects)
}

/// Update the status of a prospect, bumping `updated_at`.
pub async fn update_prospect_status(
    pool: &PgPool,
    id: Uuid,
    status: ProspectStatus,
) -> Result<()> {
    let result =
        sqlx::query("UPDATE prospects SET status = $1, updated_at = now() WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(pool)
            .await
            .context("failed to update prospect status")?;

    if result.rows_affected() == 0 {
        anyhow::bail!("prospect {id} not found");
    }

    Ok(())
}

/// Delete a prospect and, via FK cascade, its call logs.
pub async fn delete_prospect(pool: &PgPool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM prospects WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("failed to delete prospect")?;

    if result.rows_affected() == 0 {
        anyhow::bail!("prospect {id} not found");
    }

    Ok(())
}
