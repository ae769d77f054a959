//! Integration tests for plan and task persistence: the transactional
//! plan insert, status transitions, stats aggregation and cascade delete.

use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use outpost_db::models::{PlanStatus, TaskStatus};
use outpost_db::queries::tasks::NewTask;
use outpost_db::queries::{plans, tasks};
use outpost_test_utils::{create_test_db, drop_test_db};

fn week() -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
    (start, start + Duration::days(6))
}

fn draft(weekday: i32, slot: i32) -> NewTask {
    NewTask {
        weekday,
        slot,
        account_id: Uuid::new_v4(),
        account_name: format!("account-{weekday}-{slot}"),
        group_id: Uuid::new_v4(),
        group_name: "Lisbon Makers".to_string(),
        group_url: "https://facebook.com/groups/lisbon-makers".to_string(),
        template_id: Uuid::new_v4(),
        template_title: "Intro".to_string(),
        body: "Hello there".to_string(),
        media_id: None,
        media_url: None,
        scheduled_at: Utc::now() + Duration::minutes(i64::from(weekday * 1440 + slot * 45)),
    }
}

#[tokio::test]
async fn insert_plan_with_tasks_commits_atomically() {
    let (pool, db_name) = create_test_db().await;
    let (start, end) = week();

    let drafts: Vec<NewTask> = (0..3).map(|slot| draft(0, slot)).collect();
    let plan = plans::insert_plan_with_tasks(&pool, start, end, &drafts)
        .await
        .expect("insert should succeed");

    assert_eq!(plan.week_start, start);
    assert_eq!(plan.week_end, end);
    assert_eq!(plan.total_tasks, 3);
    assert_eq!(plan.status, PlanStatus::Active);

    let stored = tasks::list_tasks_for_plan(&pool, plan.id).await.unwrap();
    assert_eq!(stored.len(), 3);
    assert!(stored.iter().all(|t| t.status == TaskStatus::Pending));
    assert_eq!(stored[0].account_name, "account-0-0");

    // Ordered by scheduled time.
    for pair in stored.windows(2) {
        assert!(pair[0].scheduled_at < pair[1].scheduled_at);
    }

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn second_active_plan_is_refused_without_writes() {
    let (pool, db_name) = create_test_db().await;
    let (start, end) = week();

    let first = plans::insert_plan_with_tasks(&pool, start, end, &[draft(0, 0)])
        .await
        .expect("first plan should succeed");

    let err = plans::insert_plan_with_tasks(&pool, start, end, &[draft(0, 1)])
        .await
        .expect_err("second active plan must be refused");
    assert!(err.to_string().contains("active plan already exists"));

    let all = plans::list_plans(&pool).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, first.id);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn completing_frees_the_active_slot() {
    let (pool, db_name) = create_test_db().await;
    let (start, end) = week();

    let first = plans::insert_plan_with_tasks(&pool, start, end, &[draft(0, 0)])
        .await
        .unwrap();
    let completed = plans::complete_plan(&pool, first.id)
        .await
        .expect("complete should succeed");
    assert_eq!(completed.status, PlanStatus::Completed);

    // A new plan can now be created.
    plans::insert_plan_with_tasks(&pool, start, end, &[draft(0, 0)])
        .await
        .expect("new plan after completion should succeed");

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn transitions_guard_status_and_existence() {
    let (pool, db_name) = create_test_db().await;
    let (start, end) = week();

    let plan = plans::insert_plan_with_tasks(&pool, start, end, &[draft(0, 0)])
        .await
        .unwrap();
    plans::cancel_plan(&pool, plan.id).await.unwrap();

    // Already cancelled: a second transition fails and says why.
    let err = plans::complete_plan(&pool, plan.id)
        .await
        .expect_err("transition from cancelled must fail");
    assert!(err.to_string().contains("cancelled"));

    let err = plans::complete_plan(&pool, Uuid::new_v4())
        .await
        .expect_err("missing plan must fail");
    assert!(err.to_string().contains("not found"));

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn task_status_updates_and_stats() {
    let (pool, db_name) = create_test_db().await;
    let (start, end) = week();

    let drafts: Vec<NewTask> = (0..4).map(|slot| draft(0, slot)).collect();
    let plan = plans::insert_plan_with_tasks(&pool, start, end, &drafts)
        .await
        .unwrap();
    let stored = tasks::list_tasks_for_plan(&pool, plan.id).await.unwrap();

    tasks::update_task_status(&pool, stored[0].id, TaskStatus::Completed)
        .await
        .unwrap();
    tasks::update_task_status(&pool, stored[1].id, TaskStatus::Failed)
        .await
        .unwrap();
    tasks::update_task_status(&pool, stored[2].id, TaskStatus::Joining)
        .await
        .unwrap();

    let stats = tasks::get_plan_stats(&pool, plan.id).await.unwrap();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.joining, 1);
    assert_eq!(stats.distinct_groups, 4);
    assert_eq!(stats.distinct_accounts, 4);

    let err = tasks::update_task_status(&pool, Uuid::new_v4(), TaskStatus::Completed)
        .await
        .expect_err("missing task must fail");
    assert!(err.to_string().contains("not found"));

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn deleting_a_plan_cascades_to_tasks() {
    let (pool, db_name) = create_test_db().await;
    let (start, end) = week();

    let plan = plans::insert_plan_with_tasks(&pool, start, end, &[draft(0, 0), draft(0, 1)])
        .await
        .unwrap();

    plans::delete_plan(&pool, plan.id)
        .await
        .expect("delete should succeed");

    assert!(plans::get_plan(&pool, plan.id).await.unwrap().is_none());
    let orphans: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE plan_id = $1")
        .bind(plan.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(orphans.0, 0);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn get_active_plan_tracks_the_single_active_row() {
    let (pool, db_name) = create_test_db().await;
    let (start, end) = week();

    assert!(plans::get_active_plan(&pool).await.unwrap().is_none());

    let plan = plans::insert_plan_with_tasks(&pool, start, end, &[draft(0, 0)])
        .await
        .unwrap();
    let active = plans::get_active_plan(&pool).await.unwrap().unwrap();
    assert_eq!(active.id, plan.id);

    plans::cancel_plan(&pool, plan.id).await.unwrap();
    assert!(plans::get_active_plan(&pool).await.unwrap().is_none());

    pool.close().await;
    drop_test_db(&db_name).await;
}
