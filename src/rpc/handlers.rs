//! HTTP handlers.
//!
//! Responses are bare JSON (no envelope). Errors are `{"error": "..."}`
//! with a status derived from the [`Error`] variant.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use super::server::AppState;
use crate::core::project::{NewProject, Project, ProjectId};
use crate::dashboard::data::DashboardData;
use crate::error::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// API ERROR
// ═══════════════════════════════════════════════════════════════════════════════

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable message
    pub error: String,
    /// Stable error code
    pub code: u32,
}

/// Wrapper mapping [`Error`] onto an HTTP response
#[derive(Debug)]
pub struct ApiError(pub Error);

impl ApiError {
    /// Status code for the wrapped error
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::ProjectNotFound(_) => StatusCode::NOT_FOUND,
            Error::MissingField(_) | Error::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            Error::Source(_) | Error::Deserialization(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.0.to_string(),
            code: self.0.code(),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

// ═══════════════════════════════════════════════════════════════════════════════
// HANDLERS
// ═══════════════════════════════════════════════════════════════════════════════

/// GET /health - Health check
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "projboard-server",
        "version": crate::VERSION
    }))
}

/// GET /projects - List all projects
pub async fn list_projects(State(state): State<Arc<AppState>>) -> Json<Vec<Project>> {
    let registry = state.registry.read().await;
    Json(registry.list())
}

/// POST /projects - Create a project
pub async fn add_project(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewProject>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let mut registry = state.registry.write().await;

    let project = registry.create(req).map_err(|e| {
        warn!(error = %e, "project rejected");
        ApiError(e)
    })?;

    info!(id = %project.id, name = %project.name, "project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// DELETE /projects/:id - Delete a project
pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id: ProjectId = id.parse()?;
    let mut registry = state.registry.write().await;

    let removed = registry.delete(id)?;
    info!(id = %removed.id, name = %removed.name, "project deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/dashboard-data - Full dashboard payload
pub async fn dashboard_data(State(state): State<Arc<AppState>>) -> ApiResult<Json<DashboardData>> {
    let data = state.source.load().map_err(|e| {
        warn!(error = %e, source = %state.source.describe(), "dashboard source failed");
        ApiError(e)
    })?;

    let data = match &state.rules {
        Some(rules) => rules.annotate(data),
        None => data,
    };

    Ok(Json(data))
}
