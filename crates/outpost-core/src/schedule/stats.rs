//! In-memory plan statistics.
//!
//! The SQL aggregate in `outpost_db::queries::tasks::get_plan_stats` is the
//! fast path for the API; this reduction serves callers that already hold
//! the task list and want the same numbers without another round trip.

use std::collections::HashSet;

use outpost_db::models::{Task, TaskStatus};
use outpost_db::queries::tasks::PlanStats;

/// Reduce a task list to status counts and distinct group/account totals.
pub fn compute_stats(tasks: &[Task]) -> PlanStats {
    let mut stats = PlanStats {
        total: tasks.len() as i64,
        ..PlanStats::default()
    };

    let mut groups = HashSet::new();
    let mut accounts = HashSet::new();

    for task in tasks {
        match task.status {
            TaskStatus::Pending => stats.pending += 1,
            TaskStatus::Completed => stats.completed += 1,
            TaskStatus::Failed => stats.failed += 1,
            TaskStatus::Joining => stats.joining += 1,
        }
        groups.insert(task.group_id);
        accounts.insert(task.account_id);
    }

    stats.distinct_groups = groups.len() as i64;
    stats.distinct_accounts = accounts.len() as i64;
    stats
}
