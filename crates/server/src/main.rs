use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use server_api::{list_projects, list_skills, submit_contact, toggle_like, ApiContext};
use shared::{
    domain::{ProjectId, ProjectSummary, SkillSummary, UserId},
    error::{ApiError, ErrorCode},
    protocol::{ContactRequest, ContactResponse, LikeResponse},
};
use storage::Storage;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::{load_settings, prepare_database_url};

const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Deserialize)]
struct LikeQuery {
    user_id: Option<i64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = load_settings();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let database_url = prepare_database_url(&settings.database_url);
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    let state = AppState {
        api: ApiContext { storage },
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/projects", get(http_list_projects))
        .route("/projects/:project_id/like", post(http_toggle_like))
        .route("/skills", get(http_list_skills))
        .route("/contact", post(http_submit_contact))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .with_state(state)
}

fn status_for(code: &ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn reject(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = status_for(&err.code);
    if status.is_server_error() {
        error!(message = %err.message, "request failed");
    } else {
        warn!(code = ?err.code, message = %err.message, "request rejected");
    }
    (status, Json(err))
}

async fn healthz(
    State(state): State<Arc<AppState>>,
) -> Result<&'static str, (StatusCode, Json<ApiError>)> {
    state
        .api
        .storage
        .health_check()
        .await
        .map_err(|e| reject(ApiError::new(ErrorCode::Internal, e.to_string())))?;
    Ok("ok")
}

async fn http_list_projects(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProjectSummary>>, (StatusCode, Json<ApiError>)> {
    let projects = list_projects(&state.api).await.map_err(reject)?;
    Ok(Json(projects))
}

async fn http_list_skills(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SkillSummary>>, (StatusCode, Json<ApiError>)> {
    let skills = list_skills(&state.api).await.map_err(reject)?;
    Ok(Json(skills))
}

async fn http_toggle_like(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<i64>,
    Query(q): Query<LikeQuery>,
) -> Result<Json<LikeResponse>, (StatusCode, Json<ApiError>)> {
    let response = toggle_like(&state.api, q.user_id.map(UserId), ProjectId(project_id))
        .await
        .map_err(reject)?;
    Ok(Json(response))
}

async fn http_submit_contact(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ContactRequest>,
) -> Result<Json<ContactResponse>, (StatusCode, Json<ApiError>)> {
    let response = submit_contact(&state.api, &req).await.map_err(reject)?;
    Ok(Json(response))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
