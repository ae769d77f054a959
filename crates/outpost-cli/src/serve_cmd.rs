use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use outpost_core::import::{self, ProspectImport};
use outpost_core::matching;
use outpost_core::schedule::compute_stats;
use outpost_db::models::{CallCenterRecord, ProspectSource, ProspectStatus, Task, TaskStatus, WeeklyPlan};
use outpost_db::queries::tasks::PlanStats;
use outpost_db::queries::{plans as plan_db, prospects as prospect_db, tasks as task_db};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("{err:#}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    #[serde(flatten)]
    pub plan: WeeklyPlan,
    pub stats: PlanStats,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Deserialize)]
pub struct TaskStatusRequest {
    pub status: TaskStatus,
}

#[derive(Debug, Deserialize)]
pub struct ProspectStatusRequest {
    pub status: ProspectStatus,
}

#[derive(Debug, Deserialize)]
pub struct ProspectListQuery {
    pub status: Option<ProspectStatus>,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub imported: usize,
    pub skipped: usize,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub matched: bool,
    pub record: Option<CallCenterRecord>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(pool: PgPool) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/plan", get(get_active_plan))
        .route("/api/plan/stats", get(get_active_plan_stats))
        .route("/api/tasks/{id}/status", post(set_task_status))
        .route("/api/prospects", get(list_prospects))
        .route("/api/prospects/import", post(import_prospects))
        .route("/api/prospects/{id}", patch(set_prospect_status))
        .route("/api/prospects/{id}/match", get(match_prospect))
        .layer(CorsLayer::permissive())
        .with_state(pool)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(pool: PgPool, bind: &str, port: u16) -> Result<()> {
    let app = build_router(pool);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("outpost serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("outpost serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index(State(pool): State<PgPool>) -> Result<axum::response::Response, AppError> {
    let row = match plan_db::get_active_plan(&pool).await.map_err(AppError::internal)? {
        Some(plan) => {
            let stats = task_db::get_plan_stats(&pool, plan.id)
                .await
                .map_err(AppError::internal)?;
            format!(
                "<tr><td>{}</td><td>{} to {}</td><td>{}/{} completed</td></tr>",
                plan.id, plan.week_start, plan.week_end, stats.completed, stats.total
            )
        }
        None => "<tr><td colspan=\"3\">No active plan.</td></tr>".to_string(),
    };

    let html = format!(
        "<!DOCTYPE html>\
<html><head><title>outpost</title></head><body>\
<h1>outpost</h1>\
<p><a href=\"/api/plan\">/api/plan</a> | <a href=\"/api/prospects\">/api/prospects</a></p>\
<table><tr><th>Plan</th><th>Week</th><th>Progress</th></tr>{row}</table>\
</body></html>"
    );

    Ok(Html(html).into_response())
}

async fn get_active_plan(
    State(pool): State<PgPool>,
) -> Result<axum::response::Response, AppError> {
    let plan = plan_db::get_active_plan(&pool)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found("no active plan"))?;

    // The task list is needed anyway, so reduce stats from it instead of
    // issuing a second aggregate query.
    let tasks = task_db::list_tasks_for_plan(&pool, plan.id)
        .await
        .map_err(AppError::internal)?;
    let stats = compute_stats(&tasks);

    Ok(Json(PlanResponse { plan, stats, tasks }).into_response())
}

async fn get_active_plan_stats(
    State(pool): State<PgPool>,
) -> Result<axum::response::Response, AppError> {
    let plan = plan_db::get_active_plan(&pool)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found("no active plan"))?;

    let stats = task_db::get_plan_stats(&pool, plan.id)
        .await
        .map_err(AppError::internal)?;

    Ok(Json(stats).into_response())
}

async fn set_task_status(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
    Json(req): Json<TaskStatusRequest>,
) -> Result<axum::response::Response, AppError> {
    let task = task_db::get_task(&pool, id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found(format!("task {id} not found")))?;

    task_db::update_task_status(&pool, task.id, req.status)
        .await
        .map_err(AppError::internal)?;

    let task = task_db::get_task(&pool, id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found(format!("task {id} not found")))?;

    Ok(Json(task).into_response())
}

async fn list_prospects(
    State(pool): State<PgPool>,
    Query(query): Query<ProspectListQuery>,
) -> Result<axum::response::Response, AppError> {
    let prospects = prospect_db::list_prospects(&pool, query.status)
        .await
        .map_err(AppError::internal)?;

    Ok(Json(prospects).into_response())
}

async fn import_prospects(
    State(pool): State<PgPool>,
    Json(records): Json<Vec<ProspectImport>>,
) -> Result<axum::response::Response, AppError> {
    if records.is_empty() {
        return Err(AppError::bad_request("import body is an empty array"));
    }

    let report = import::import_prospects(&pool, &records, ProspectSource::JsonImport)
        .await
        .map_err(AppError::internal)?;

    Ok(Json(ImportResponse {
        imported: report.imported,
        skipped: report.skipped,
    })
    .into_response())
}

async fn set_prospect_status(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
    Json(req): Json<ProspectStatusRequest>,
) -> Result<axum::response::Response, AppError> {
    prospect_db::get_prospect(&pool, id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found(format!("prospect {id} not found")))?;

    prospect_db::update_prospect_status(&pool, id, req.status)
        .await
        .map_err(AppError::internal)?;

    let prospect = prospect_db::get_prospect(&pool, id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found(format!("prospect {id} not found")))?;

    Ok(Json(prospect).into_response())
}

async fn match_prospect(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<axum::response::Response, AppError> {
    let prospect = prospect_db::get_prospect(&pool, id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found(format!("prospect {id} not found")))?;

    let record = matching::match_prospect(&pool, &prospect.name, &prospect.phones)
        .await
        .map_err(AppError::internal)?;

    Ok(Json(MatchResponse {
        matched: record.is_some(),
        record,
    })
    .into_response())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
