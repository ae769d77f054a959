//! `outpost status` command: database overview and active plan progress.

use anyhow::Result;
use sqlx::PgPool;

use outpost_db::pool;
use outpost_db::queries::{plans, tasks};

pub async fn run_status(db_pool: &PgPool) -> Result<()> {
    let counts = pool::table_counts(db_pool).await?;
    println!("Tables:");
    for (table, count) in &counts {
        println!("  {table}: {count} rows");
    }
    println!();

    match plans::get_active_plan(db_pool).await? {
        Some(plan) => {
            let stats = tasks::get_plan_stats(db_pool, plan.id).await?;
            println!(
                "Active plan {} ({} to {})",
                plan.id, plan.week_start, plan.week_end
            );
            println!(
                "  {}/{} completed (pending={} failed={} joining={})",
                stats.completed, stats.total, stats.pending, stats.failed, stats.joining
            );
        }
        None => println!("No active plan."),
    }

    Ok(())
}
