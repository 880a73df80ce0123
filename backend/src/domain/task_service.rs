use tracing::info;

use crate::db::DbConnection;
use crate::domain::error::ServiceError;
use shared::{DeleteResponse, FieldErrors, Task, TaskForm, TaskListResponse, TaskQuery, TaskResponse};

/// Service for managing tasks
#[derive(Clone)]
pub struct TaskService {
    db: DbConnection,
}

impl TaskService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// List tasks in alphabetical order
    pub async fn list_tasks(&self, query: TaskQuery) -> Result<TaskListResponse, ServiceError> {
        let tasks = self.db.list_tasks(&query).await?;

        info!("Found {} tasks", tasks.len());

        Ok(TaskListResponse { tasks })
    }

    /// Get a task by id
    pub async fn get_task(&self, id: i64) -> Result<Task, ServiceError> {
        self.db
            .get_task(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("task", id))
    }

    /// Create a new task
    pub async fn create_task(&self, form: TaskForm) -> Result<TaskResponse, ServiceError> {
        info!("Creating task: {} ({} points)", form.name, form.points);

        let form = Self::validate(form)?;
        let task = self.db.insert_task(&form).await?;

        info!("Created task {} with id {}", task.name, task.id);

        Ok(Self::saved("created", task))
    }

    /// Update an existing task
    pub async fn update_task(&self, id: i64, form: TaskForm) -> Result<TaskResponse, ServiceError> {
        info!("Updating task {}", id);

        if self.db.get_task(id).await?.is_none() {
            return Err(ServiceError::not_found("task", id));
        }

        let form = Self::validate(form)?;
        self.db.update_task(id, &form).await?;

        let task = Task {
            id,
            name: form.name,
            points: form.points,
            active: form.active,
        };

        Ok(Self::saved("updated", task))
    }

    /// Delete a task; dependent chores cascade away with it
    pub async fn delete_task(&self, id: i64) -> Result<DeleteResponse, ServiceError> {
        let task = self
            .db
            .get_task(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("task", id))?;

        self.db.delete_task(id).await?;

        info!("Deleted task {} with id {}", task.name, id);

        Ok(DeleteResponse {
            success_message: format!("Successfully deleted {}!", task.name),
            redirect_to: "/tasks".to_string(),
        })
    }

    /// Name must be non-blank and points non-negative
    fn validate(mut form: TaskForm) -> Result<TaskForm, ServiceError> {
        form.name = form.name.trim().to_string();

        let mut errors = FieldErrors::default();
        if form.name.is_empty() {
            errors.add("name", "Name can't be blank");
        }
        if form.points < 0 {
            errors.add(
                "points",
                format!("{} is less than 0, needs to be non-negative", form.points),
            );
        }

        if errors.is_empty() {
            Ok(form)
        } else {
            Err(ServiceError::Validation(errors))
        }
    }

    fn saved(verb: &str, task: Task) -> TaskResponse {
        TaskResponse {
            success_message: format!("Successfully {} {}!", verb, task.name),
            redirect_to: format!("/tasks/{}", task.id),
            task,
        }
    }
}
