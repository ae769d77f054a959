//! Database query functions for the `call_logs` table.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{CallLog, CallOutcome, Disposition};

/// Insert a call log for a prospect. `extras` carries the optional
/// quality-scoring and classification fields from the call form.
pub async fn insert_call_log(
    pool: &PgPool,
    prospect_id: Uuid,
    outcome: CallOutcome,
    disposition: Disposition,
    notes: Option<&str>,
    extras: serde_json::Value,
) -> Result<CallLog> {
    let log = sqlx::query_as::<_, CallLog>(
        "INSERT INTO call_logs (prospect_id, outcome, disposition, notes, extras) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING *",
    )
    .bind(prospect_id)
    .bind(outcome)
    .bind(disposition)
    .bind(notes)
    .bind(extras)
    .fetch_one(pool)
    .await
    .with_context(|| format!("failed to insert call log for prospect {prospect_id}"))?;

    Ok(log)
}

/// List call logs for a prospect, most recent first.
pub async fn list_calls_for_prospect(pool: &PgPool, prospect_id: Uuid) -> Result<Vec<CallLog>> {
    let logs = sqlx::query_as::<_, CallLog>(
        "SELECT * FROM call_logs WHERE prospect_id = $1 ORDER BY called_at DESC",
    )
    .bind(prospect_id)
    .fetch_all(pool)
    .await
    .context("failed to list call logs")?;

    Ok(logs)
}
