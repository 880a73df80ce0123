//! Handlers for the chore views, mounted at the application root.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::info;

use crate::domain::ServiceError;
use crate::rest::{error_response, AppState};
use shared::{ChoreForm, ChoreQuery, ChoreSort, DueWindow, FormRedisplay};

/// Query parameters for the chore list endpoint.
///
/// Unknown values fall back to the canonical listing (chronological,
/// unfiltered) rather than erroring.
#[derive(Deserialize, Debug, Default)]
pub struct ChoreListParams {
    pub status: Option<String>,
    pub due: Option<String>,
    pub sort: Option<String>,
}

impl ChoreListParams {
    fn to_query(&self) -> ChoreQuery {
        ChoreQuery {
            sort: match self.sort.as_deref() {
                Some("by_task") => ChoreSort::ByTask,
                _ => ChoreSort::Chronological,
            },
            completed: match self.status.as_deref() {
                Some("done") => Some(true),
                Some("pending") => Some(false),
                _ => None,
            },
            due: match self.due.as_deref() {
                Some("upcoming") => Some(DueWindow::Upcoming),
                Some("past") => Some(DueWindow::Past),
                _ => None,
            },
        }
    }
}

/// GET /
pub async fn list_chores(
    State(state): State<AppState>,
    Query(params): Query<ChoreListParams>,
) -> impl IntoResponse {
    info!("GET / - params: {:?}", params);

    match state.chore_service.list_chores(params.to_query()).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /:id
pub async fn get_chore(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    info!("GET /{}", id);

    match state.chore_service.get_chore(id).await {
        Ok(chore) => (StatusCode::OK, Json(chore)).into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /new - a blank form
pub async fn new_chore() -> impl IntoResponse {
    Json(ChoreForm::default())
}

/// POST /new
pub async fn create_chore(
    State(state): State<AppState>,
    Json(form): Json<ChoreForm>,
) -> impl IntoResponse {
    info!("POST /new - form: {:?}", form);

    match state.chore_service.create_chore(form.clone()).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(ServiceError::Validation(errors)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(FormRedisplay { form, errors }),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /edit/:id - the form prefilled from the record
pub async fn edit_chore(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    info!("GET /edit/{}", id);

    match state.chore_service.get_chore(id).await {
        Ok(chore) => (StatusCode::OK, Json(ChoreForm::from(&chore))).into_response(),
        Err(err) => error_response(err),
    }
}

/// POST /edit/:id
pub async fn update_chore(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<ChoreForm>,
) -> impl IntoResponse {
    info!("POST /edit/{} - form: {:?}", id, form);

    match state.chore_service.update_chore(id, form.clone()).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(ServiceError::Validation(errors)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(FormRedisplay { form, errors }),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// POST /delete/:id
pub async fn delete_chore(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    info!("POST /delete/{}", id);

    match state.chore_service.delete_chore(id).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => error_response(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_map_to_query() {
        let params = ChoreListParams {
            status: Some("done".to_string()),
            due: Some("upcoming".to_string()),
            sort: Some("by_task".to_string()),
        };
        let query = params.to_query();
        assert_eq!(query.completed, Some(true));
        assert_eq!(query.due, Some(DueWindow::Upcoming));
        assert_eq!(query.sort, ChoreSort::ByTask);
    }

    #[test]
    fn test_unknown_params_fall_back_to_canonical() {
        let params = ChoreListParams {
            status: Some("half-done".to_string()),
            due: Some("someday".to_string()),
            sort: Some("by_vibes".to_string()),
        };
        assert_eq!(params.to_query(), ChoreQuery::default());
    }
}
