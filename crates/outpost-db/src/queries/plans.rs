//! Database query functions for the `weekly_plans` table.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{PlanStatus, WeeklyPlan};
use crate::queries::tasks::{self, NewTask};

/// Fetch a plan by its ID.
pub async fn get_plan(pool: &PgPool, id: Uuid) -> Result<Option<WeeklyPlan>> {
    let plan = sqlx::query_as::<_, WeeklyPlan>("SELECT * FROM weekly_plans WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch plan")?;

    Ok(plan)
}

/// Fetch the currently active plan, if any. At most one is expected.
pub async fn get_active_plan(pool: &PgPool) -> Result<Option<WeeklyPlan>> {
    let plan = sqlx::query_as::<_, WeeklyPlan>(
        "SELECT * FROM weekly_plans WHERE status = 'active' \
         ORDER BY created_at DESC LIMIT 1",
    )
    .fetch_optional(pool)
    .await
    .context("failed to fetch active plan")?;

    Ok(plan)
}

/// List all plans, ordered by creation time (newest first).
pub async fn list_plans(pool: &PgPool) -> Result<Vec<WeeklyPlan>> {
    let plans =
        sqlx::query_as::<_, WeeklyPlan>("SELECT * FROM weekly_plans ORDER BY created_at DESC")
            .fetch_all(pool)
            .await
            .context("failed to list plans")?;

    Ok(plans)
}

/// Insert a plan and all of its generated tasks in a single transaction.
///
/// Refuses when an active plan already exists. Nothing is committed if any
/// insert fails: either the whole week lands or none of it does.
pub async fn insert_plan_with_tasks(
    pool: &PgPool,
    week_start: NaiveDate,
    week_end: NaiveDate,
    drafts: &[NewTask],
) -> Result<WeeklyPlan> {
    let mut tx = pool.begin().await.context("failed to begin transaction")?;

    let active: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM weekly_plans WHERE status = 'active')",
    )
    .fetch_one(&mut *tx)
    .await
    .context("failed to check for an active plan")?;

    if active {
        anyhow::bail!("an active plan already exists; clear or complete it first");
    }

    let plan = sqlx::query_as::<_, WeeklyPlan>(
        "INSERT INTO weekly_plans (week_start, week_end, total_tasks) \
         VALUES ($1, $2, $3) \
         RETURNING *",
    )
    .bind(week_start)
    .bind(week_end)
    .bind(drafts.len() as i32)
    .fetch_one(&mut *tx)
    .await
    .context("failed to insert plan")?;

    for draft in drafts {
        tasks::insert_task(&mut *tx, plan.id, draft).await?;
    }

    tx.commit().await.context("failed to commit plan")?;

    Ok(plan)
}

/// Transition a plan from `active` to `completed`.
///
/// Fails if the plan is not found or is not active.
pub async fn complete_plan(pool: &PgPool, id: Uuid) -> Result<WeeklyPlan> {
    transition_plan(pool, id, PlanStatus::Completed).await
}

/// Transition a plan from `active` to `cancelled`.
pub async fn cancel_plan(pool: &PgPool, id: Uuid) -> Result<WeeklyPlan> {
    transition_plan(pool, id, PlanStatus::Cancelled).await
}

async fn transition_plan(pool: &PgPool, id: Uuid, to: PlanStatus) -> Result<WeeklyPlan> {
    let plan = sqlx::query_as::<_, WeeklyPlan>(
        "UPDATE weekly_plans SET status = $1 \
         WHERE id = $2 AND status = 'active' \
         RETURNING *",
    )
    .bind(to)
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("failed to transition plan status")?;

    match plan {
        Some(p) => Ok(p),
        None => {
            // Distinguish between "not found" and "wrong status".
            let existing = get_plan(pool, id).await?;
            match existing {
                None => anyhow::bail!("plan {id} not found"),
                Some(p) => anyhow::bail!(
                    "plan {id} cannot transition to {to}: current status is {} (must be active)",
                    p.status
                ),
            }
        }
    }
}

/// Delete a plan and, via FK cascade, all of its tasks.
pub async fn delete_plan(pool: &PgPool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM weekly_plans WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("failed to delete plan")?;

    if result.rows_affected() == 0 {
        anyhow::bail!("plan {id} not found");
    }

    Ok(())
}
