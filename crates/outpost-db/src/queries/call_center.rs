//! Database query functions for the `call_center_records` table, including
//! the "add to CRM" copy.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{CallCenterRecord, CallLog, Prospect, ProspectStatus};

/// Insert a call-center record directly (e.g. seeded from an external feed).
pub async fn insert_record(
    pool: &PgPool,
    name: &str,
    phones: &[String],
) -> Result<CallCenterRecord> {
    let record = sqlx::query_as::<_, CallCenterRecord>(
        "INSERT INTO call_center_records (name, phones) VALUES ($1, $2) RETURNING *",
    )
    .bind(name)
    .bind(phones)
    .fetch_one(pool)
    .await
    .context("failed to insert call-center record")?;

    Ok(record)
}

/// List all call-center records. Input to the duplicate matcher.
pub async fn list_records(pool: &PgPool) -> Result<Vec<CallCenterRecord>> {
    let records = sqlx::query_as::<_, CallCenterRecord>(
        "SELECT * FROM call_center_records ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await
    .context("failed to list call-center records")?;

    Ok(records)
}

/// Copy a prospect (name, phones, full call history) into the call-center
/// collection and mark it `added_to_crm`, all in one transaction.
///
/// Fails without writing anything when the prospect is missing or has
/// already been copied.
pub async fn copy_prospect_to_crm(pool: &PgPool, prospect_id: Uuid) -> Result<CallCenterRecord> {
    let mut tx = pool.begin().await.context("failed to begin transaction")?;

    let prospect = sqlx::query_as::<_, Prospect>("SELECT * FROM prospects WHERE id = $1")
        .bind(prospect_id)
        .fetch_optional(&mut *tx)
        .await
        .context("failed to fetch prospect")?;

    let prospect = match prospect {
        Some(p) => p,
        None => anyhow::bail!("prospect {prospect_id} not found"),
    };

    if prospect.status == ProspectStatus::AddedToCrm {
        anyhow::bail!("prospect {prospect_id} was already added to the CRM");
    }

    let history: Vec<CallLog> = sqlx::query_as(
        "SELECT * FROM call_logs WHERE prospect_id = $1 ORDER BY called_at ASC",
    )
    .bind(prospect_id)
    .fetch_all(&mut *tx)
    .await
    .context("failed to fetch call history")?;

    let history_json =
        serde_json::to_value(&history).context("failed to serialize call history")?;

    let record = sqlx::query_as::<_, CallCenterRecord>(
        "INSERT INTO call_center_records (name, phones, source_prospect_id, call_history) \
         VALUES ($1, $2, $3, $4) \
         RETURNING *",
    )
    .bind(&prospect.name)
    .bind(&prospect.phones)
    .bind(prospect_id)
    .bind(history_json)
    .fetch_one(&mut *tx)
    .await
    .context("failed to insert call-center record")?;

    sqlx::query("UPDATE prospects SET status = 'added_to_crm', updated_at = now() WHERE id = $1")
        .bind(prospect_id)
        .execute(&mut *tx)
        .await
        .context("failed to mark prospect as added to CRM")?;

    tx.commit().await.context("failed to commit CRM copy")?;

    Ok(record)
}
