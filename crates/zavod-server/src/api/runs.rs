use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;
use serde_json::Value;
use zavod_core::PersistedRun;
use zavod_export::{run_to_markdown, to_blotato_payload};
use zavod_store::RunRepository;

use crate::middleware::RequestId;

use super::{map_store_error, ApiError, ApiResponse, AppState};

const MARKDOWN_FILENAME: &str = "carousel-latest.md";

#[derive(Debug, Serialize)]
pub(super) struct ApproveResult {
    run_id: String,
    dry_run: bool,
    response: Value,
}

fn load_latest(state: &AppState, req_id: &str) -> Result<PersistedRun, ApiError> {
    state
        .worker
        .runs()
        .latest()
        .map_err(|e| map_store_error(req_id.to_string(), &e))?
        .ok_or_else(|| ApiError::new(req_id, "not_found", "no runs found"))
}

pub(super) async fn latest_run(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<PersistedRun>>, ApiError> {
    let run = load_latest(&state, &req_id.0)?;
    Ok(Json(ApiResponse::new(run, req_id.0)))
}

pub(super) async fn get_run(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(run_id): Path<String>,
) -> Result<Json<ApiResponse<PersistedRun>>, ApiError> {
    let run = state
        .worker
        .runs()
        .find(&run_id)
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(req_id.0.clone(), "not_found", format!("run {run_id} not found"))
        })?;
    Ok(Json(ApiResponse::new(run, req_id.0)))
}

/// Latest run as a Markdown attachment.
pub(super) async fn latest_run_markdown(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Response, ApiError> {
    let run = load_latest(&state, &req_id.0)?;
    let markdown = run_to_markdown(&run);
    Ok((
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={MARKDOWN_FILENAME}"),
            ),
        ],
        markdown,
    )
        .into_response())
}

/// Send the latest run to Blotato (or echo the payload in dry-run mode).
pub(super) async fn approve_latest_run(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<ApproveResult>>, ApiError> {
    let run = load_latest(&state, &req_id.0)?;
    let payload = to_blotato_payload(&run.carousel, &run.analyzed, &state.brand);

    let response = state
        .blotato
        .create_video_from_template(&payload)
        .await
        .map_err(|e| {
            tracing::error!(run_id = %run.id, error = %e, "render request failed");
            ApiError::new(req_id.0.clone(), "upstream_error", e.to_string())
        })?;
    tracing::info!(run_id = %run.id, dry_run = state.blotato.is_dry_run(), "run approved");

    Ok(Json(ApiResponse::new(
        ApproveResult {
            run_id: run.id,
            dry_run: state.blotato.is_dry_run(),
            response,
        },
        req_id.0,
    )))
}
