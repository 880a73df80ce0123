//! REST interface: one handler module per entity plus the router and
//! shared application state. Handlers translate service results into
//! JSON result objects for the presentation layer.

pub mod child_apis;
pub mod chore_apis;
pub mod task_apis;

use axum::{
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

use crate::db::DbConnection;
use crate::domain::{ChildService, ChoreService, ServiceError, TaskService};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub child_service: ChildService,
    pub task_service: TaskService,
    pub chore_service: ChoreService,
}

impl AppState {
    pub fn new(db: DbConnection) -> Self {
        Self {
            child_service: ChildService::new(db.clone()),
            task_service: TaskService::new(db.clone()),
            chore_service: ChoreService::new(db),
        }
    }
}

/// Create the Axum router with all routes configured.
///
/// Chores live at the root, children and tasks under their own prefixes,
/// matching the original URL layout of the app.
pub fn create_router(state: AppState) -> Router {
    // CORS setup to allow a browser frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:8080".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let children = Router::new()
        .route("/", get(child_apis::list_children))
        .route("/new", get(child_apis::new_child).post(child_apis::create_child))
        .route("/:id", get(child_apis::get_child))
        .route("/edit/:id", get(child_apis::edit_child).post(child_apis::update_child))
        .route("/delete/:id", post(child_apis::delete_child));

    let tasks = Router::new()
        .route("/", get(task_apis::list_tasks))
        .route("/new", get(task_apis::new_task).post(task_apis::create_task))
        .route("/:id", get(task_apis::get_task))
        .route("/edit/:id", get(task_apis::edit_task).post(task_apis::update_task))
        .route("/delete/:id", post(task_apis::delete_task));

    Router::new()
        .route("/", get(chore_apis::list_chores))
        .route("/new", get(chore_apis::new_chore).post(chore_apis::create_chore))
        .route("/:id", get(chore_apis::get_chore))
        .route("/edit/:id", get(chore_apis::edit_chore).post(chore_apis::update_chore))
        .route("/delete/:id", post(chore_apis::delete_chore))
        .nest("/children", children)
        .nest("/tasks", tasks)
        .layer(cors)
        .with_state(state)
}

/// Map a service error onto a response.
///
/// Handlers that want to echo the rejected form intercept `Validation`
/// before falling through to this.
pub(crate) fn error_response(err: ServiceError) -> Response {
    match err {
        ServiceError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()).into_response(),
        ServiceError::Validation(errors) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response()
        }
        ServiceError::Database(e) => {
            error!("Database error: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chrono::Local;
    use serde_json::{json, Value};
    use shared::{
        ChildDetailResponse, ChildForm, ChildListResponse, ChildResponse, ChoreForm,
        ChoreListResponse, ChoreResponse, DeleteResponse, FormRedisplay, TaskResponse,
    };
    use tower::ServiceExt;

    async fn test_app() -> Router {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        create_router(AppState::new(db))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().uri(uri).method(method);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(serde_json::to_vec(&json).unwrap())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn create_child(app: &Router, first_name: &str, last_name: &str) -> ChildResponse {
        let (status, body) = send(
            app,
            Method::POST,
            "/children/new",
            Some(json!({ "first_name": first_name, "last_name": last_name })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        serde_json::from_slice(&body).unwrap()
    }

    async fn create_task(app: &Router, name: &str, points: i64) -> TaskResponse {
        let (status, body) = send(
            app,
            Method::POST,
            "/tasks/new",
            Some(json!({ "name": name, "points": points })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_create_child_then_detail() {
        let app = test_app().await;

        let created = create_child(&app, "John", "Smith").await;
        assert_eq!(created.success_message, "Successfully created John Smith!");
        assert_eq!(created.redirect_to, format!("/children/{}", created.child.id));

        // Following the redirect shows the detail view
        let (status, body) = send(&app, Method::GET, &created.redirect_to, None).await;
        assert_eq!(status, StatusCode::OK);
        let detail: ChildDetailResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(detail.child.full_name(), "John Smith");
        assert_eq!(detail.points_earned, 0);
    }

    #[tokio::test]
    async fn test_create_child_validation_redisplays_form() {
        let app = test_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/children/new",
            Some(json!({ "first_name": "", "last_name": "", "active": false })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let redisplay: FormRedisplay<ChildForm> = serde_json::from_slice(&body).unwrap();
        assert_eq!(redisplay.form.first_name, "");
        assert!(!redisplay.form.active);
        assert_eq!(
            redisplay.errors.messages_for("first_name"),
            vec!["First name can't be blank"]
        );

        // Nothing was persisted
        let (_, body) = send(&app, Method::GET, "/children", None).await;
        let listing: ChildListResponse = serde_json::from_slice(&body).unwrap();
        assert!(listing.children.is_empty());
    }

    #[tokio::test]
    async fn test_child_detail_not_found() {
        let app = test_app().await;

        let (status, _) = send(&app, Method::GET, "/children/9999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_new_and_edit_child_forms() {
        let app = test_app().await;

        // Blank form with the active default
        let (status, body) = send(&app, Method::GET, "/children/new", None).await;
        assert_eq!(status, StatusCode::OK);
        let blank: ChildForm = serde_json::from_slice(&body).unwrap();
        assert_eq!(blank, ChildForm::default());
        assert!(blank.active);

        // Prefilled edit form
        let created = create_child(&app, "Alex", "Heimann").await;
        let uri = format!("/children/edit/{}", created.child.id);
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let prefilled: ChildForm = serde_json::from_slice(&body).unwrap();
        assert_eq!(prefilled.first_name, "Alex");

        let (status, _) = send(&app, Method::GET, "/children/edit/9999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_child() {
        let app = test_app().await;

        let created = create_child(&app, "Alex", "Heimann").await;
        let uri = format!("/children/edit/{}", created.child.id);
        let (status, body) = send(
            &app,
            Method::POST,
            &uri,
            Some(json!({ "first_name": "Batman", "last_name": "Heimann" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let updated: ChildResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(updated.success_message, "Successfully updated Batman Heimann!");
        assert_eq!(updated.redirect_to, format!("/children/{}", created.child.id));
    }

    #[tokio::test]
    async fn test_delete_child_redirects_to_list() {
        let app = test_app().await;

        let created = create_child(&app, "Alex", "Heimann").await;
        let uri = format!("/children/delete/{}", created.child.id);
        let (status, body) = send(&app, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let deleted: DeleteResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(deleted.success_message, "Successfully deleted Alex Heimann!");
        assert_eq!(deleted.redirect_to, "/children");

        let (status, _) = send(&app, Method::GET, &created.redirect_to, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_children_active_filter() {
        let app = test_app().await;

        create_child(&app, "Alex", "Heimann").await;
        let (status, _) = send(
            &app,
            Method::POST,
            "/children/new",
            Some(json!({ "first_name": "Rachel", "last_name": "Heimann", "active": false })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, body) = send(&app, Method::GET, "/children?active=true", None).await;
        let listing: ChildListResponse = serde_json::from_slice(&body).unwrap();
        let names: Vec<&str> = listing.children.iter().map(|c| c.first_name.as_str()).collect();
        assert_eq!(names, vec!["Alex"]);
    }

    #[tokio::test]
    async fn test_task_points_validation() {
        let app = test_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/tasks/new",
            Some(json!({ "name": "Wash dishes", "points": -1 })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let redisplay: FormRedisplay<shared::TaskForm> = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            redisplay.errors.messages_for("points"),
            vec!["-1 is less than 0, needs to be non-negative"]
        );

        // Zero points is fine
        let created = create_task(&app, "Wash dishes", 0).await;
        assert_eq!(created.task.points, 0);
    }

    #[tokio::test]
    async fn test_chore_lifecycle() {
        let app = test_app().await;

        let child = create_child(&app, "Alex", "Heimann").await;
        let task = create_task(&app, "Wash dishes", 1).await;
        let due = Local::now().date_naive().to_string();

        let (status, body) = send(
            &app,
            Method::POST,
            "/new",
            Some(json!({
                "child_id": child.child.id,
                "task_id": task.task.id,
                "due_on": due,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let created: ChoreResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(created.success_message, "Successfully created chore!");
        assert_eq!(created.redirect_to, format!("/{}", created.chore.id));

        let (status, body) = send(&app, Method::GET, &created.redirect_to, None).await;
        assert_eq!(status, StatusCode::OK);
        let chore: shared::Chore = serde_json::from_slice(&body).unwrap();
        assert_eq!(chore.task_name, "Wash dishes");

        let (_, body) = send(&app, Method::GET, "/", None).await;
        let listing: ChoreListResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(listing.chores.len(), 1);

        let uri = format!("/delete/{}", created.chore.id);
        let (status, body) = send(&app, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let deleted: DeleteResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(deleted.redirect_to, "/");
    }

    #[tokio::test]
    async fn test_chore_dangling_reference_redisplays_form() {
        let app = test_app().await;

        let due = Local::now().date_naive().to_string();
        let (status, body) = send(
            &app,
            Method::POST,
            "/new",
            Some(json!({ "child_id": 98, "task_id": 99, "due_on": due })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let redisplay: FormRedisplay<ChoreForm> = serde_json::from_slice(&body).unwrap();
        assert_eq!(redisplay.form.child_id, 98);
        assert_eq!(
            redisplay.errors.messages_for("child"),
            vec!["child 98 does not exist"]
        );
        assert_eq!(
            redisplay.errors.messages_for("task"),
            vec!["task 99 does not exist"]
        );
    }

    #[tokio::test]
    async fn test_chore_list_filters() {
        let app = test_app().await;

        let child = create_child(&app, "Alex", "Heimann").await;
        let dishes = create_task(&app, "Wash dishes", 1).await;
        let sweep = create_task(&app, "Sweep floor", 1).await;
        let due = Local::now().date_naive().to_string();

        for (task_id, completed) in [(dishes.task.id, true), (sweep.task.id, false)] {
            let (status, _) = send(
                &app,
                Method::POST,
                "/new",
                Some(json!({
                    "child_id": child.child.id,
                    "task_id": task_id,
                    "due_on": due,
                    "completed": completed,
                })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (_, body) = send(&app, Method::GET, "/?status=done", None).await;
        let done: ChoreListResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(done.chores.len(), 1);
        assert_eq!(done.chores[0].task_name, "Wash dishes");

        let (_, body) = send(&app, Method::GET, "/?status=pending&due=upcoming", None).await;
        let pending: ChoreListResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(pending.chores.len(), 1);
        assert_eq!(pending.chores[0].task_name, "Sweep floor");

        let (_, body) = send(&app, Method::GET, "/?sort=by_task", None).await;
        let by_task: ChoreListResponse = serde_json::from_slice(&body).unwrap();
        let names: Vec<&str> = by_task.chores.iter().map(|c| c.task_name.as_str()).collect();
        assert_eq!(names, vec!["Sweep floor", "Wash dishes"]);
    }
}
