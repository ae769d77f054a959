//! Database query functions for the `media` table.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Media;

/// Insert a new media row. Returns the inserted row.
pub async fn insert_media(
    pool: &PgPool,
    file_name: &str,
    storage_path: &str,
    url: &str,
    size_bytes: i64,
    mime_type: &str,
) -> Result<Media> {
    let media = sqlx::query_as::<_, Media>(
        "INSERT INTO media (file_name, storage_path, url, size_bytes, mime_type) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING *",
    )
    .bind(file_name)
    .bind(storage_path)
    .bind(url)
    .bind(size_bytes)
    .bind(mime_type)
    .fetch_one(pool)
    .await
    .context("failed to insert media")?;

    Ok(media)
}

/// Fetch a media row by its ID.
pub async fn get_media(pool: &PgPool, id: Uuid) -> Result<Option<Media>> {
    let media = sqlx::query_as::<_, Media>("SELECT * FROM media WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch media")?;

    Ok(media)
}

/// List all media, ordered by creation time (newest first).
pub async fn list_media(pool: &PgPool) -> Result<Vec<Media>> {
    let media = sqlx::query_as::<_, Media>("SELECT * FROM media ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
        .context("failed to list media")?;

    Ok(media)
}

/// Delete a media row. The caller is responsible for removing the stored
/// file; the row is the source of truth.
pub async fn delete_media(pool: &PgPool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM media WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("failed to delete media")?;

    if result.rows_affected() == 0 {
        anyhow::bail!("media {id} not found");
    }

    Ok(())
}
