use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use zavod_core::{GenerationTask, Platform, TaskStatus};
use zavod_store::TaskRepository;

use crate::middleware::RequestId;

use super::{map_store_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct CreateTaskRequest {
    pub url: String,
    pub platform: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ListTasksQuery {
    pub status: Option<String>,
}

pub(super) async fn create_task(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<ApiResponse<GenerationTask>>), ApiError> {
    let url = body.url.trim();
    if url.is_empty() {
        return Err(ApiError::new(req_id.0, "validation_error", "url must not be empty"));
    }
    let platform = match body.platform.as_deref() {
        None => Platform::Youtube,
        Some(raw) => raw
            .parse::<Platform>()
            .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e))?,
    };

    let task = GenerationTask::new(url, platform);
    {
        let _guard = state.queue_lock.lock().await;
        state
            .worker
            .tasks()
            .add(&task)
            .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    }
    tracing::info!(task_id = %task.id, url = %task.source_url, "task created");

    Ok((StatusCode::CREATED, Json(ApiResponse::new(task, req_id.0))))
}

pub(super) async fn list_tasks(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ListTasksQuery>,
) -> Result<Json<ApiResponse<Vec<GenerationTask>>>, ApiError> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<TaskStatus>)
        .transpose()
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e))?;

    let tasks = state
        .worker
        .tasks()
        .list(status)
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new(tasks, req_id.0)))
}

pub(super) async fn get_task(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<GenerationTask>>, ApiError> {
    let task = state
        .worker
        .tasks()
        .get(&id)
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", format!("task {id} not found")))?;
    Ok(Json(ApiResponse::new(task, req_id.0)))
}

/// Run the worker on the oldest pending task; `data` is `null` when the
/// queue has none.
pub(super) async fn process_one(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Option<GenerationTask>>>, ApiError> {
    let _guard = state.queue_lock.lock().await;
    match state.worker.process_one_pending().await {
        Ok(task) => Ok(Json(ApiResponse::new(task, req_id.0))),
        Err(e) => {
            tracing::error!(error = %e, "task processing failed");
            Err(ApiError::new(req_id.0, "pipeline_error", e.to_string()))
        }
    }
}
