use chrono::{Local, NaiveDate};
use tracing::info;

use crate::db::DbConnection;
use crate::domain::error::ServiceError;
use shared::{Chore, ChoreForm, ChoreListResponse, ChoreQuery, ChoreResponse, DeleteResponse, FieldErrors};

/// Service for managing chores, the assignments of tasks to children
#[derive(Clone)]
pub struct ChoreService {
    db: DbConnection,
}

impl ChoreService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// List chores per the query specification.
    ///
    /// The upcoming/past windows are anchored to the local date at the
    /// moment the query runs.
    pub async fn list_chores(&self, query: ChoreQuery) -> Result<ChoreListResponse, ServiceError> {
        let today = Local::now().date_naive();
        let chores = self.db.list_chores(&query, today).await?;

        info!("Found {} chores", chores.len());

        Ok(ChoreListResponse { chores })
    }

    /// Get a chore by id
    pub async fn get_chore(&self, id: i64) -> Result<Chore, ServiceError> {
        self.db
            .get_chore(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("chore", id))
    }

    /// Create a new chore
    pub async fn create_chore(&self, form: ChoreForm) -> Result<ChoreResponse, ServiceError> {
        info!(
            "Creating chore: child {} task {} due {}",
            form.child_id, form.task_id, form.due_on
        );

        let due_on = self.validate(&form).await?;
        let chore = self
            .db
            .insert_chore(form.child_id, form.task_id, due_on, form.completed)
            .await?;

        info!("Created chore {} for {}", chore.id, chore.child_name);

        Ok(Self::saved("created", chore))
    }

    /// Update an existing chore
    pub async fn update_chore(&self, id: i64, form: ChoreForm) -> Result<ChoreResponse, ServiceError> {
        info!("Updating chore {}", id);

        if self.db.get_chore(id).await?.is_none() {
            return Err(ServiceError::not_found("chore", id));
        }

        let due_on = self.validate(&form).await?;
        self.db
            .update_chore(id, form.child_id, form.task_id, due_on, form.completed)
            .await?;

        // Re-read so the response carries the joined names
        let chore = self
            .db
            .get_chore(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("chore", id))?;

        Ok(Self::saved("updated", chore))
    }

    /// Delete a chore
    pub async fn delete_chore(&self, id: i64) -> Result<DeleteResponse, ServiceError> {
        if self.db.get_chore(id).await?.is_none() {
            return Err(ServiceError::not_found("chore", id));
        }

        self.db.delete_chore(id).await?;

        info!("Deleted chore {}", id);

        Ok(DeleteResponse {
            success_message: "Successfully deleted chore!".to_string(),
            redirect_to: "/".to_string(),
        })
    }

    /// Both references must resolve and the due date must parse.
    ///
    /// A dangling child or task id is a validation failure on that field,
    /// never a store error; all failures are collected in one pass.
    async fn validate(&self, form: &ChoreForm) -> Result<NaiveDate, ServiceError> {
        let mut errors = FieldErrors::default();

        if !self.db.child_exists(form.child_id).await? {
            errors.add("child", format!("child {} does not exist", form.child_id));
        }
        if !self.db.task_exists(form.task_id).await? {
            errors.add("task", format!("task {} does not exist", form.task_id));
        }

        let due_on = match NaiveDate::parse_from_str(&form.due_on, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                errors.add("due_on", "due_on must be a date in YYYY-MM-DD format");
                None
            }
        };

        match due_on {
            Some(date) if errors.is_empty() => Ok(date),
            _ => Err(ServiceError::Validation(errors)),
        }
    }

    fn saved(verb: &str, chore: Chore) -> ChoreResponse {
        ChoreResponse {
            success_message: format!("Successfully {} chore!", verb),
            redirect_to: format!("/{}", chore.id),
            chore,
        }
    }
}
