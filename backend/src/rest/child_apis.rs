//! Handlers for the child views: list, detail, new/edit forms, delete.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::info;

use crate::domain::ServiceError;
use crate::rest::{error_response, AppState};
use shared::{ChildForm, ChildQuery, FormRedisplay};

/// Query parameters for the child list endpoint
#[derive(Deserialize, Debug, Default)]
pub struct ChildListParams {
    pub active: Option<bool>,
}

/// GET /children
pub async fn list_children(
    State(state): State<AppState>,
    Query(params): Query<ChildListParams>,
) -> impl IntoResponse {
    info!("GET /children - params: {:?}", params);

    let query = ChildQuery {
        active_only: params.active.unwrap_or(false),
    };
    match state.child_service.list_children(query).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /children/:id
pub async fn get_child(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    info!("GET /children/{}", id);

    match state.child_service.get_child(id).await {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /children/new - a blank form
pub async fn new_child() -> impl IntoResponse {
    Json(ChildForm::default())
}

/// POST /children/new
pub async fn create_child(
    State(state): State<AppState>,
    Json(form): Json<ChildForm>,
) -> impl IntoResponse {
    info!("POST /children/new - form: {:?}", form);

    match state.child_service.create_child(form.clone()).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(ServiceError::Validation(errors)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(FormRedisplay { form, errors }),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /children/edit/:id - the form prefilled from the record
pub async fn edit_child(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    info!("GET /children/edit/{}", id);

    match state.child_service.get_child(id).await {
        Ok(detail) => (StatusCode::OK, Json(ChildForm::from(&detail.child))).into_response(),
        Err(err) => error_response(err),
    }
}

/// POST /children/edit/:id
pub async fn update_child(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<ChildForm>,
) -> impl IntoResponse {
    info!("POST /children/edit/{} - form: {:?}", id, form);

    match state.child_service.update_child(id, form.clone()).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(ServiceError::Validation(errors)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(FormRedisplay { form, errors }),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// POST /children/delete/:id
pub async fn delete_child(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    info!("POST /children/delete/{}", id);

    match state.child_service.delete_child(id).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => error_response(err),
    }
}
