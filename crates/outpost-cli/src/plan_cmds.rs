//! `outpost plan` and `outpost task` commands.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime, Utc};
use clap::Subcommand;
use sqlx::PgPool;
use uuid::Uuid;

use outpost_core::plan_service::{clear_active_plan, generate_weekly_plan, week_start_for};
use outpost_core::schedule::PlanSettings;
use outpost_db::models::{Task, TaskStatus, WeeklyPlan};
use outpost_db::queries::{plans, tasks};

const WEEKDAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Generate a new weekly plan from the stored resources
    Generate {
        /// Posts per day
        #[arg(long, default_value_t = 5)]
        tasks_per_day: u32,
        /// First slot time each day (HH:MM)
        #[arg(long, default_value = "09:00")]
        start_time: String,
        /// Minutes between slots
        #[arg(long, default_value_t = 45)]
        interval: u32,
        /// Schedule all 7 days instead of Monday-Friday
        #[arg(long)]
        full_week: bool,
        /// Week start date (YYYY-MM-DD, a Monday; defaults to the current week)
        #[arg(long)]
        week_start: Option<String>,
    },
    /// Show the active plan and its tasks
    Show,
    /// Delete the active plan and all of its tasks
    Clear,
    /// Mark the active plan completed
    Complete,
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Set a task's status: pending, completed, failed, joining
    SetStatus {
        /// Task ID
        id: String,
        /// New status
        status: String,
    },
    /// List the active plan's tasks
    List,
}

pub async fn run_plan_command(command: PlanCommands, pool: &PgPool) -> Result<()> {
    match command {
        PlanCommands::Generate {
            tasks_per_day,
            start_time,
            interval,
            full_week,
            week_start,
        } => {
            let start_time = NaiveTime::parse_from_str(&start_time, "%H:%M")
                .with_context(|| format!("invalid start time: {start_time} (expected HH:MM)"))?;
            let week_start = match week_start {
                Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                    .with_context(|| format!("invalid week start: {s} (expected YYYY-MM-DD)"))?,
                None => week_start_for(Utc::now().date_naive()),
            };

            let settings = PlanSettings {
                tasks_per_day,
                start_time,
                interval_minutes: interval,
                force_full_week: full_week,
            };

            let (plan, tasks) = generate_weekly_plan(pool, &settings, week_start).await?;
            println!(
                "Plan {} generated for week {}: {} tasks.",
                plan.id,
                plan.week_start,
                tasks.len()
            );
        }
        PlanCommands::Show => {
            let Some(plan) = plans::get_active_plan(pool).await? else {
                println!("No active plan.");
                return Ok(());
            };
            print_plan(pool, &plan).await?;
        }
        PlanCommands::Clear => match clear_active_plan(pool).await? {
            Some(plan) => println!("Plan {} cleared ({} tasks removed).", plan.id, plan.total_tasks),
            None => println!("No active plan to clear."),
        },
        PlanCommands::Complete => {
            let plan = plans::get_active_plan(pool)
                .await?
                .context("no active plan to complete")?;
            let plan = plans::complete_plan(pool, plan.id).await?;
            println!("Plan {} marked {}.", plan.id, plan.status);
        }
    }
    Ok(())
}

pub async fn run_task_command(command: TaskCommands, pool: &PgPool) -> Result<()> {
    match command {
        TaskCommands::SetStatus { id, status } => {
            let id = Uuid::parse_str(&id).with_context(|| format!("invalid task ID: {id}"))?;
            let status: TaskStatus = status
                .parse()
                .map_err(|e| anyhow::anyhow!("{e} (expected pending, completed, failed or joining)"))?;
            tasks::update_task_status(pool, id, status).await?;
            println!("Task {id} set to {status}.");
        }
        TaskCommands::List => {
            let Some(plan) = plans::get_active_plan(pool).await? else {
                println!("No active plan.");
                return Ok(());
            };
            let list = tasks::list_tasks_for_plan(pool, plan.id).await?;
            print_task_table(&list);
        }
    }
    Ok(())
}

async fn print_plan(pool: &PgPool, plan: &WeeklyPlan) -> Result<()> {
    println!(
        "Plan {} ({} to {}, {})",
        plan.id, plan.week_start, plan.week_end, plan.status
    );

    let stats = tasks::get_plan_stats(pool, plan.id).await?;
    println!(
        "Progress: {}/{} completed (pending={} failed={} joining={})",
        stats.completed, stats.total, stats.pending, stats.failed, stats.joining
    );
    println!(
        "Spread: {} groups, {} accounts",
        stats.distinct_groups, stats.distinct_accounts
    );
    println!();

    let list = tasks::list_tasks_for_plan(pool, plan.id).await?;
    print_task_table(&list);
    Ok(())
}

fn print_task_table(list: &[Task]) {
    if list.is_empty() {
        println!("No tasks.");
        return;
    }

    println!(
        "{:<38} {:<4} {:<17} {:<20} {:<24} {:<10}",
        "ID", "DAY", "TIME", "ACCOUNT", "GROUP", "STATUS"
    );
    println!("{}", "-".repeat(118));
    for t in list {
        let day = WEEKDAY_NAMES
            .get(t.weekday as usize)
            .copied()
            .unwrap_or("?");
        println!(
            "{:<38} {:<4} {:<17} {:<20} {:<24} {:<10}",
            t.id,
            day,
            t.scheduled_at.format("%Y-%m-%d %H:%M"),
            t.account_name,
            t.group_name,
            t.status
        );
    }
}
