//! Database query functions for the `templates` table.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Template;

/// Insert a new template row. Returns the inserted template.
pub async fn insert_template(pool: &PgPool, title: &str, body: &str) -> Result<Template> {
    let template = sqlx::query_as::<_, Template>(
        "INSERT INTO templates (title, body) VALUES ($1, $2) RETURNING *",
    )
    .bind(title)
    .bind(body)
    .fetch_one(pool)
    .await
    .context("failed to insert template")?;

    Ok(template)
}

/// Fetch a template by its ID.
pub async fn get_template(pool: &PgPool, id: Uuid) -> Result<Option<Template>> {
    let template = sqlx::query_as::<_, Template>("SELECT * FROM templates WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch template")?;

    Ok(template)
}

/// List all templates, ordered by creation time (oldest first, so the
/// round-robin order is stable).
pub async fn list_templates(pool: &PgPool) -> Result<Vec<Template>> {
    let templates =
        sqlx::query_as::<_, Template>("SELECT * FROM templates ORDER BY created_at ASC")
            .fetch_all(pool)
            .await
            .context("failed to list templates")?;

    Ok(templates)
}

/// Update a template's title and body.
pub async fn update_template(pool: &PgPool, id: Uuid, title: &str, body: &str) -> Result<()> {
    let result = sqlx::query("UPDATE templates SET title = $1, body = $2 WHERE id = $3")
        .bind(title)
        .bind(body)
        .bind(id)
        .execute(pool)
        .await
        .context("failed to update template")?;

    if result.rows_affected() == 0 {
        anyhow::bail!("template {id} not found");
    }

    Ok(())
}

/// Delete a template.
pub async fn delete_template(pool: &PgPool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM templates WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("failed to delete template")?;

    if result.rows_affected() == 0 {
        anyhow::bail!("template {id} not found");
    }

    Ok(())
}
