//! Route handlers.

use super::dto::{
    CreateTaskRequest, Pagination, StatusUpdateRequest, TaskResponse, UpdateTaskRequest,
};
use super::error::ApiError;
use crate::error::TaskError;
use crate::service::TaskService;
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

/// State shared across handlers.
#[derive(Clone)]
pub struct ApiState {
    service: TaskService,
    default_page_size: usize,
    debug: bool,
}

impl ApiState {
    pub fn new(service: TaskService, default_page_size: usize, debug: bool) -> Self {
        Self {
            service,
            default_page_size,
            debug,
        }
    }

    /// Convert a store failure, logging the unexpected ones.
    fn error(&self, err: TaskError) -> ApiError {
        if !err.is_recoverable() {
            tracing::error!(error = %err, "Request failed");
        }
        ApiError::from_task_error(&err, self.debug)
    }
}

type TaskPath = Result<Path<i64>, PathRejection>;

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Service banner.
pub(super) async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Todo task service is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Health check endpoint. Reports `degraded` when the store cannot be read.
pub(super) async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let status = match state.service.ping() {
        Ok(_) => "healthy",
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the store");
            "degraded"
        }
    };
    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub(super) async fn create_task(
    State(state): State<ApiState>,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let Json(request) = body?;
    let task = state
        .service
        .add_task(request.into())
        .map_err(|e| state.error(e))?;
    Ok((StatusCode::CREATED, Json(task.into())))
}

pub(super) async fn list_tasks(
    State(state): State<ApiState>,
    query: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    let Query(page) = query?;
    let skip = page.skip.unwrap_or(0);
    let limit = page.limit.unwrap_or(state.default_page_size);

    let tasks = state
        .service
        .list_tasks(skip, limit)
        .map_err(|e| state.error(e))?;
    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

pub(super) async fn get_task(
    State(state): State<ApiState>,
    path: TaskPath,
) -> Result<Json<TaskResponse>, ApiError> {
    let Path(task_id) = path?;
    let task = state
        .service
        .find_task(task_id)
        .map_err(|e| state.error(e))?
        .ok_or_else(|| state.error(TaskError::not_found(task_id)))?;
    Ok(Json(task.into()))
}

pub(super) async fn update_task(
    State(state): State<ApiState>,
    path: TaskPath,
    body: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<TaskResponse>, ApiError> {
    let Path(task_id) = path?;
    let Json(request) = body?;
    let task = state
        .service
        .update_task(task_id, request.into())
        .map_err(|e| state.error(e))?;
    Ok(Json(task.into()))
}

pub(super) async fn update_task_status(
    State(state): State<ApiState>,
    path: TaskPath,
    body: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Result<Json<TaskResponse>, ApiError> {
    let Path(task_id) = path?;
    let Json(request) = body?;
    let task = state
        .service
        .mark_task_complete(task_id, request.completed)
        .map_err(|e| state.error(e))?;
    Ok(Json(task.into()))
}

pub(super) async fn delete_task(
    State(state): State<ApiState>,
    path: TaskPath,
) -> Result<StatusCode, ApiError> {
    let Path(task_id) = path?;
    state
        .service
        .delete_task(task_id)
        .map_err(|e| state.error(e))?;
    Ok(StatusCode::NO_CONTENT)
}
