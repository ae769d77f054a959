//! Database query functions for the `tasks` table.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Task, TaskStatus};

/// A task produced by the weekly generator, not yet persisted.
///
/// Carries the denormalized display copies that get frozen onto the row.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub weekday: i32,
    pub slot: i32,
    pub account_id: Uuid,
    pub account_name: String,
    pub group_id: Uuid,
    pub group_name: String,
    pub group_url: String,
    pub template_id: Uuid,
    pub template_title: String,
    pub body: String,
    pub media_id: Option<Uuid>,
    pub media_url: Option<String>,
    pub scheduled_at: DateTime<Utc>,
}

/// Insert one task row for a plan. Generic over the executor so it can run
/// inside the plan-creation transaction.
pub async fn insert_task<'e, E>(executor: E, plan_id: Uuid, new: &NewTask) -> Result<Task>
where
    E: sqlx::PgExecutor<'e>,
{
    let task = sqlx::query_as::<_, Task>(
        "INSERT INTO tasks (plan_id, weekday, slot, \
                            account_id, account_name, \
                            group_id, group_name, group_url, \
                            template_id, template_title, body, \
                            media_id, media_url, scheduled_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
         RETURNING *",
    )
    .bind(plan_id)
    .bind(new.weekday)
    .bind(new.slot)
    .bind(new.account_id)
    .bind(&new.account_name)
    .bind(new.group_id)
    .bind(&new.group_name)
    .bind(&new.group_url)
    .bind(new.template_id)
    .bind(&new.template_title)
    .bind(&new.body)
    .bind(new.media_id)
    .bind(new.media_url.as_deref())
    .bind(new.scheduled_at)
    .fetch_one(executor)
    .await
    .context("failed to insert task")?;

    Ok(task)
}

/// Fetch a single task by ID.
pub async fn get_task(pool: &PgPool, id: Uuid) -> Result<Option<Task>> {
    let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch task")?;

    Ok(task)
}

/// List all tasks for a given plan, in schedule order.
pub async fn list_tasks_for_plan(pool: &PgPool, plan_id: Uuid) -> Result<Vec<Task>> {
    let tasks = sqlx::query_as::<_, Task>(
        "SELECT * FROM tasks WHERE plan_id = $1 ORDER BY scheduled_at ASC",
    )
    .bind(plan_id)
    .fetch_all(pool)
    .await
    .context("failed to list tasks for plan")?;

    Ok(tasks)
}

/// Update the status of a task.
pub async fn update_task_status(pool: &PgPool, id: Uuid, status: TaskStatus) -> Result<()> {
    let result = sqlx::query("UPDATE tasks SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await
        .context("failed to update task status")?;

    if result.rows_affected() == 0 {
        anyhow::bail!("task {id} not found");
    }

    Ok(())
}

/// Status counts plus distinct account/group usage for a plan's tasks.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct PlanStats {
    pub pending: i64,
    pub completed: i64,
    pub failed: i64,
    pub joining: i64,
    pub total: i64,
    pub distinct_groups: i64,
    pub distinct_accounts: i64,
}

/// Get a summary of task counts by status for a given plan.
///
/// A pure reduction over the task list; nothing is maintained incrementally.
pub async fn get_plan_stats(pool: &PgPool, plan_id: Uuid) -> Result<PlanStats> {
    let rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT status::text, COUNT(*) as cnt \
         FROM tasks \
         WHERE plan_id = $1 \
         GROUP BY status",
    )
    .bind(plan_id)
    .fetch_all(pool)
    .await
    .context("failed to get plan stats")?;

    let mut stats = PlanStats::default();
    for (status, count) in &rows {
        match status.as_str() {
            "pending" => stats.pending = *count,
            "completed" => stats.completed = *count,
            "failed" => stats.failed = *count,
            "joining" => stats.joining = *count,
            _ => {}
        }
        stats.total += count;
    }

    let (groups, accounts): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(DISTINCT group_id), COUNT(DISTINCT account_id) \
         FROM tasks WHERE plan_id = $1",
    )
    .bind(plan_id)
    .fetch_one(pool)
    .await
    .context("failed to count distinct groups and accounts")?;

    stats.distinct_groups = groups;
    stats.distinct_accounts = accounts;

    Ok(stats)
}
