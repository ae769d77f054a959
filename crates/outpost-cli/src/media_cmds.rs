//! `outpost media` commands: the managed media directory.
//!
//! `add` copies the source file into the media directory and records a
//! metadata row; `rm` deletes the row first and then the stored file
//! best-effort. The row is the source of truth, a stray file on disk is
//! harmless but a row without a file breaks plan generation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use outpost_db::queries::media;

#[derive(Subcommand)]
pub enum MediaCommands {
    /// Copy an image into the media directory and register it
    Add {
        /// Path to the source file
        file: String,
    },
    /// List all media items
    List,
    /// Delete a media item (row first, stored file best-effort)
    Rm {
        /// Media ID
        id: String,
    },
}

pub async fn run_media_command(
    command: MediaCommands,
    pool: &PgPool,
    media_dir: &Path,
) -> Result<()> {
    match command {
        MediaCommands::Add { file } => {
            let item = add_media(pool, media_dir, Path::new(&file)).await?;
            println!("Media {} added ({}).", item.file_name, item.id);
            println!("  stored at {}", item.storage_path);
        }
        MediaCommands::List => {
            let list = media::list_media(pool).await?;
            if list.is_empty() {
                println!("No media found.");
                return Ok(());
            }
            println!("{:<38} {:<28} {:>10} {:<12}", "ID", "FILE", "BYTES", "TYPE");
            println!("{}", "-".repeat(92));
            for m in &list {
                println!(
                    "{:<38} {:<28} {:>10} {:<12}",
                    m.id, m.file_name, m.size_bytes, m.mime_type
                );
            }
        }
        MediaCommands::Rm { id } => {
            let id = Uuid::parse_str(&id).with_context(|| format!("invalid media ID: {id}"))?;
            remove_media(pool, id).await?;
            println!("Media {id} deleted.");
        }
    }
    Ok(())
}

async fn add_media(
    pool: &PgPool,
    media_dir: &Path,
    source: &Path,
) -> Result<outpost_db::models::Media> {
    let file_name = source
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{} has no usable file name", source.display()))?
        .to_string();

    std::fs::create_dir_all(media_dir)
        .with_context(|| format!("failed to create media directory {}", media_dir.display()))?;

    // Prefix with a fresh UUID so repeated uploads of the same name never
    // collide.
    let stored_name = format!("{}-{file_name}", Uuid::new_v4().simple());
    let dest: PathBuf = media_dir.join(&stored_name);

    let size_bytes = std::fs::copy(source, &dest)
        .with_context(|| format!("failed to copy {} into the media store", source.display()))?;

    let storage_path = dest.to_string_lossy().into_owned();
    let url = format!("file://{storage_path}");
    let mime_type = mime_for_extension(source);

    let item = media::insert_media(
        pool,
        &file_name,
        &storage_path,
        &url,
        size_bytes as i64,
        mime_type,
    )
    .await;

    match item {
        Ok(item) => Ok(item),
        Err(e) => {
            // The copy landed but the row did not; take the file back out.
            let _ = std::fs::remove_file(&dest);
            Err(e)
        }
    }
}

async fn remove_media(pool: &PgPool, id: Uuid) -> Result<()> {
    let item = media::get_media(pool, id)
        .await?
        .with_context(|| format!("media {id} not found"))?;

    media::delete_media(pool, id).await?;

    if let Err(e) = std::fs::remove_file(&item.storage_path) {
        warn!(path = %item.storage_path, error = %e, "stored file could not be removed");
    }

    Ok(())
}

fn mime_for_extension(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("mp4") => "video/mp4",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outpost_test_utils::{create_test_db, drop_test_db};

    #[test]
    fn mime_mapping_covers_the_common_image_types() {
        assert_eq!(mime_for_extension(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(mime_for_extension(Path::new("a.png")), "image/png");
        assert_eq!(mime_for_extension(Path::new("a")), "application/octet-stream");
    }

    #[tokio::test]
    async fn add_copies_and_rm_removes() {
        let (pool, db_name) = create_test_db().await;
        let tmp = tempfile::TempDir::new().unwrap();
        let media_dir = tmp.path().join("media");

        let source = tmp.path().join("promo.jpg");
        std::fs::write(&source, b"not really a jpeg").unwrap();

        let item = add_media(&pool, &media_dir, &source)
            .await
            .expect("add should succeed");
        assert_eq!(item.file_name, "promo.jpg");
        assert_eq!(item.size_bytes, 17);
        assert_eq!(item.mime_type, "image/jpeg");
        assert!(Path::new(&item.storage_path).exists());

        remove_media(&pool, item.id).await.expect("rm should succeed");
        assert!(!Path::new(&item.storage_path).exists());
        assert!(media::get_media(&pool, item.id).await.unwrap().is_none());

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn rm_survives_a_missing_stored_file() {
        let (pool, db_name) = create_test_db().await;
        let tmp = tempfile::TempDir::new().unwrap();
        let media_dir = tmp.path().join("media");

        let source = tmp.path().join("gone.png");
        std::fs::write(&source, b"x").unwrap();

        let item = add_media(&pool, &media_dir, &source).await.unwrap();
        std::fs::remove_file(&item.storage_path).unwrap();

        // Row removal still succeeds.
        remove_media(&pool, item.id).await.expect("rm should succeed");
        assert!(media::get_media(&pool, item.id).await.unwrap().is_none());

        pool.close().await;
        drop_test_db(&db_name).await;
    }
}
