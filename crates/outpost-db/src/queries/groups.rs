//! Database query functions for the `fb_groups` table.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Group;

/// Fields for a new group row.
#[derive(Debug, Clone, Default)]
pub struct NewGroup<'a> {
    pub name: &'a str,
    pub url: &'a str,
    pub member_count: i32,
    pub language: Option<&'a str>,
    pub tags: &'a [String],
    pub owner_account_id: Option<Uuid>,
}

/// Insert a new group row. Returns the inserted group.
pub async fn insert_group(pool: &PgPool, new: &NewGroup<'_>) -> Result<Group> {
    let group = sqlx::query_as::<_, Group>(
        "INSERT INTO fb_groups (name, url, member_count, language, tags, owner_account_id) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING *",
    )
    .bind(new.name)
    .bind(new.url)
    .bind(new.member_count)
    .bind(new.language)
    .bind(new.tags)
    .bind(new.owner_account_id)
    .fetch_one(pool)
    .await
    .context("failed to insert group")?;

    Ok(group)
}

/// Fetch a group by its ID.
pub async fn get_group(pool: &PgPool, id: Uuid) -> Result<Option<Group>> {
    let group = sqlx::query_as::<_, Group>("SELECT * FROM fb_groups WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch group")?;

    Ok(group)
}

/// List all groups, ordered by name.
pub async fn list_groups(pool: &PgPool) -> Result<Vec<Group>> {
    let groups = sqlx::query_as::<_, Group>("SELECT * FROM fb_groups ORDER BY name ASC")
        .fetch_all(pool)
        .await
        .context("failed to list groups")?;

    Ok(groups)
}

/// Increment the warning count on a group (e.g. after a removed post).
pub async fn increment_warning_count(pool: &PgPool, id: Uuid) -> Result<i32> {
    let row: Option<(i32,)> = sqlx::query_as(
        "UPDATE fb_groups SET warning_count = warning_count + 1 \
         WHERE id = $1 \
         RETURNING warning_count",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("failed to increment warning count")?;

    match row {
        Some((count,)) => Ok(count),
        None => anyhow::bail!("group {id} not found"),
    }
}

/// Delete a group.
pub async fn delete_group(pool: &PgPool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM fb_groups WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("failed to delete group")?;

    if result.rows_affected() == 0 {
        anyhow::bail!("group {id} not found");
    }

    Ok(())
}
