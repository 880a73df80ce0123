//! Handlers for the task views: list, detail, new/edit forms, delete.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::info;

use crate::domain::ServiceError;
use crate::rest::{error_response, AppState};
use shared::{FormRedisplay, TaskForm, TaskQuery};

/// Query parameters for the task list endpoint
#[derive(Deserialize, Debug, Default)]
pub struct TaskListParams {
    pub active: Option<bool>,
}

/// GET /tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(params): Query<TaskListParams>,
) -> impl IntoResponse {
    info!("GET /tasks - params: {:?}", params);

    let query = TaskQuery {
        active_only: params.active.unwrap_or(false),
    };
    match state.task_service.list_tasks(query).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /tasks/:id
pub async fn get_task(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    info!("GET /tasks/{}", id);

    match state.task_service.get_task(id).await {
        Ok(task) => (StatusCode::OK, Json(task)).into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /tasks/new - a blank form
pub async fn new_task() -> impl IntoResponse {
    Json(TaskForm::default())
}

/// POST /tasks/new
pub async fn create_task(
    State(state): State<AppState>,
    Json(form): Json<TaskForm>,
) -> impl IntoResponse {
    info!("POST /tasks/new - form: {:?}", form);

    match state.task_service.create_task(form.clone()).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(ServiceError::Validation(errors)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(FormRedisplay { form, errors }),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /tasks/edit/:id - the form prefilled from the record
pub async fn edit_task(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    info!("GET /tasks/edit/{}", id);

    match state.task_service.get_task(id).await {
        Ok(task) => (StatusCode::OK, Json(TaskForm::from(&task))).into_response(),
        Err(err) => error_response(err),
    }
}

/// POST /tasks/edit/:id
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<TaskForm>,
) -> impl IntoResponse {
    info!("POST /tasks/edit/{} - form: {:?}", id, form);

    match state.task_service.update_task(id, form.clone()).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(ServiceError::Validation(errors)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(FormRedisplay { form, errors }),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// POST /tasks/delete/:id
pub async fn delete_task(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    info!("POST /tasks/delete/{}", id);

    match state.task_service.delete_task(id).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => error_response(err),
    }
}
