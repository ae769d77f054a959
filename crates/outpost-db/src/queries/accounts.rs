//! Database query functions for the `accounts` table.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Account, AccountStatus};

/// Insert a new account row. Returns the inserted account with
/// server-generated defaults (id, status, created_at).
pub async fn insert_account(
    pool: &PgPool,
    name: &str,
    fb_id: &str,
    browser_tag: Option<&str>,
    profile_image: Option<&str>,
) -> Result<Account> {
    let account = sqlx::query_as::<_, Account>(
        "INSERT INTO accounts (name, fb_id, browser_tag, profile_image) \
         VALUES ($1, $2, $3, $4) \
         RETURNING *",
    )
    .bind(name)
    .bind(fb_id)
    .bind(browser_tag)
    .bind(profile_image)
    .fetch_one(pool)
    .await
    .context("failed to insert account")?;

    Ok(account)
}

/// Fetch an account by its ID.
pub async fn get_account(pool: &PgPool, id: Uuid) -> Result<Option<Account>> {
    let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch account")?;

    Ok(account)
}

/// List all accounts, ordered by creation time (newest first).
pub async fn list_accounts(pool: &PgPool) -> Result<Vec<Account>> {
    let accounts =
        sqlx::query_as::<_, Account>("SELECT * FROM accounts ORDER BY created_at DESC")
            .fetch_all(pool)
            .await
            .context("failed to list accounts")?;

    Ok(accounts)
}

/// List only accounts eligible for plan generation.
pub async fn list_active_accounts(pool: &PgPool) -> Result<Vec<Account>> {
    let accounts = sqlx::query_as::<_, Account>(
        "SELECT * FROM accounts WHERE status = 'active' ORDER BY created_at ASC",
    )
    .fetch_all(pool)
    .await
    .context("failed to list active accounts")?;

    Ok(accounts)
}

/// Update the status of an account.
pub async fn update_account_status(pool: &PgPool, id: Uuid, status: AccountStatus) -> Result<()> {
    let result = sqlx::query("UPDATE accounts SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await
        .context("failed to update account status")?;

    if result.rows_affected() == 0 {
        anyhow::bail!("account {id} not found");
    }

    Ok(())
}

/// Delete an account. Owned groups are kept (owner set to NULL by the FK).
pub async fn delete_account(pool: &PgPool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("failed to delete account")?;

    if result.rows_affected() == 0 {
        anyhow::bail!("account {id} not found");
    }

    Ok(())
}
