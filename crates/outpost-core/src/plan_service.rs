//! Plan lifecycle orchestration.
//!
//! Pulls the active resources, runs the generator, and persists the result
//! in one transaction. Nothing is written when generation is refused.

use anyhow::{Context, Result, bail};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use sqlx::PgPool;
use tracing::info;

use outpost_db::models::{Task, WeeklyPlan};
use outpost_db::queries::{accounts, groups, media, plans, tasks, templates};

use crate::schedule::{PlanSettings, generate_week};

/// Generate and persist a new weekly plan starting at `week_start`.
///
/// `week_start` must be a Monday. Resource lists are fetched concurrently,
/// the generator runs in memory, and the plan plus all of its tasks commit
/// atomically. Fails without side effects if any required resource list is
/// empty or another plan is still active.
pub async fn generate_weekly_plan(
    pool: &PgPool,
    settings: &PlanSettings,
    week_start: NaiveDate,
) -> Result<(WeeklyPlan, Vec<Task>)> {
    if week_start.weekday() != Weekday::Mon {
        bail!("week start {week_start} is not a Monday");
    }

    let (account_list, group_list, template_list, media_list) = tokio::try_join!(
        accounts::list_active_accounts(pool),
        groups::list_groups(pool),
        templates::list_templates(pool),
        media::list_media(pool),
    )?;

    let drafts = generate_week(
        settings,
        week_start,
        &account_list,
        &group_list,
        &template_list,
        &media_list,
    )?;

    // The plan row spans the calendar week even when only weekdays carry
    // tasks.
    let week_end = week_start + Days::new(6);
    let plan = plans::insert_plan_with_tasks(pool, week_start, week_end, &drafts).await?;
    let stored = tasks::list_tasks_for_plan(pool, plan.id).await?;

    info!(
        plan_id = %plan.id,
        week_start = %week_start,
        tasks = stored.len(),
        "weekly plan generated"
    );

    Ok((plan, stored))
}

/// Delete the active plan and all of its tasks.
///
/// Returns the deleted plan, or `None` when no plan was active.
pub async fn clear_active_plan(pool: &PgPool) -> Result<Option<WeeklyPlan>> {
    let Some(plan) = plans::get_active_plan(pool).await? else {
        return Ok(None);
    };

    plans::delete_plan(pool, plan.id)
        .await
        .context("failed to clear active plan")?;

    info!(plan_id = %plan.id, "active plan cleared");
    Ok(Some(plan))
}

/// The Monday of the week containing `today`.
pub fn week_start_for(today: NaiveDate) -> NaiveDate {
    today - Days::new(u64::from(today.weekday().num_days_from_monday()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_start_snaps_to_monday() {
        // 2024-03-06 is a Wednesday.
        let wed = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
        assert_eq!(
            week_start_for(wed),
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
        );

        let mon = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert_eq!(week_start_for(mon), mon);

        let sun = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(
            week_start_for(sun),
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
        );
    }
}
