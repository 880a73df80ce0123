use tracing::info;

use crate::db::DbConnection;
use crate::domain::error::ServiceError;
use shared::{
    Child, ChildDetailResponse, ChildForm, ChildListResponse, ChildQuery, ChildResponse,
    DeleteResponse, FieldErrors,
};

/// Service for managing children
#[derive(Clone)]
pub struct ChildService {
    db: DbConnection,
}

impl ChildService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// List children in alphabetical order
    pub async fn list_children(&self, query: ChildQuery) -> Result<ChildListResponse, ServiceError> {
        let children = self.db.list_children(&query).await?;

        info!("Found {} children", children.len());

        Ok(ChildListResponse { children })
    }

    /// Get a child with the points earned from completed chores
    pub async fn get_child(&self, id: i64) -> Result<ChildDetailResponse, ServiceError> {
        let child = self
            .db
            .get_child(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("child", id))?;
        let points_earned = self.db.points_earned(id).await?;

        Ok(ChildDetailResponse {
            child,
            points_earned,
        })
    }

    /// Create a new child
    pub async fn create_child(&self, form: ChildForm) -> Result<ChildResponse, ServiceError> {
        info!("Creating child: {} {}", form.first_name, form.last_name);

        let form = Self::validate(form)?;
        let child = self.db.insert_child(&form).await?;

        info!("Created child {} with id {}", child.full_name(), child.id);

        Ok(Self::saved("created", child))
    }

    /// Update an existing child
    pub async fn update_child(&self, id: i64, form: ChildForm) -> Result<ChildResponse, ServiceError> {
        info!("Updating child {}", id);

        if self.db.get_child(id).await?.is_none() {
            return Err(ServiceError::not_found("child", id));
        }

        let form = Self::validate(form)?;
        self.db.update_child(id, &form).await?;

        let child = Child {
            id,
            first_name: form.first_name,
            last_name: form.last_name,
            active: form.active,
        };

        Ok(Self::saved("updated", child))
    }

    /// Delete a child; dependent chores cascade away with it
    pub async fn delete_child(&self, id: i64) -> Result<DeleteResponse, ServiceError> {
        let child = self
            .db
            .get_child(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("child", id))?;

        self.db.delete_child(id).await?;

        info!("Deleted child {} with id {}", child.full_name(), id);

        Ok(DeleteResponse {
            success_message: format!("Successfully deleted {}!", child.full_name()),
            redirect_to: "/children".to_string(),
        })
    }

    /// Both names must be non-blank; whitespace is trimmed before storage
    fn validate(mut form: ChildForm) -> Result<ChildForm, ServiceError> {
        form.first_name = form.first_name.trim().to_string();
        form.last_name = form.last_name.trim().to_string();

        let mut errors = FieldErrors::default();
        if form.first_name.is_empty() {
            errors.add("first_name", "First name can't be blank");
        }
        if form.last_name.is_empty() {
            errors.add("last_name", "Last name can't be blank");
        }

        if errors.is_empty() {
            Ok(form)
        } else {
            Err(ServiceError::Validation(errors))
        }
    }

    fn saved(verb: &str, child: Child) -> ChildResponse {
        ChildResponse {
            success_message: format!("Successfully {} {}!", verb, child.full_name()),
            redirect_to: format!("/children/{}", child.id),
            child,
        }
    }
}
