mod runs;
mod tasks;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use zavod_core::{AppConfig, BrandProfile};
use zavod_export::BlotatoClient;
use zavod_worker::DefaultWorker;

use crate::middleware::{request_id, require_bearer_auth, AuthState, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub worker: Arc<DefaultWorker>,
    /// Serializes every task-queue mutation; the JSONL queue has no lock.
    pub queue_lock: Arc<Mutex<()>>,
    pub blotato: Arc<BlotatoClient>,
    pub brand: Arc<BrandProfile>,
}

impl AppState {
    #[must_use]
    pub fn new(worker: DefaultWorker, blotato: BlotatoClient, brand: BrandProfile) -> Self {
        Self {
            worker: Arc::new(worker),
            queue_lock: Arc::new(Mutex::new(())),
            blotato: Arc::new(blotato),
            brand: Arc::new(brand),
        }
    }

    /// # Errors
    ///
    /// Fails when a backend client cannot be built or the brand profile
    /// cannot be loaded.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let worker = zavod_worker::default_worker(config, &config.data_dir)?;
        let blotato = BlotatoClient::from_config(config)?;
        let brand = zavod_core::resolve_brand_profile(config.brand_profile_path.as_deref())?;
        Ok(Self::new(worker, blotato, brand))
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    llm_enabled: bool,
    blotato_dry_run: bool,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, request_id: String) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_store_error(request_id: String, error: &zavod_store::StoreError) -> ApiError {
    tracing::error!(error = %error, "store access failed");
    ApiError::new(request_id, "internal_error", "store access failed")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn protected_router(auth: AuthState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/tasks",
            get(tasks::list_tasks).post(tasks::create_task),
        )
        .route("/api/v1/tasks/process-one", post(tasks::process_one))
        .route("/api/v1/tasks/{id}", get(tasks::get_task))
        .route("/api/v1/runs/latest", get(runs::latest_run))
        .route("/api/v1/runs/latest/markdown", get(runs::latest_run_markdown))
        .route("/api/v1/runs/latest/approve", post(runs::approve_latest_run))
        .route("/api/v1/runs/{run_id}", get(runs::get_run))
        .layer(axum::middleware::from_fn_with_state(
            auth,
            require_bearer_auth,
        ))
}

pub fn build_app(state: AppState, auth: AuthState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(ApiResponse::new(
        HealthData {
            status: "ok",
            llm_enabled: state.worker.llm_enabled(),
            blotato_dry_run: state.blotato.is_dry_run(),
        },
        req_id.0,
    ))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
