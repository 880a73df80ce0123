use shared::FieldErrors;
use thiserror::Error;

/// Error taxonomy for service operations.
///
/// `NotFound` and `Validation` are expected outcomes the handlers turn
/// into user-facing responses; `Database` is the only genuinely
/// unexpected case.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("validation failed")]
    Validation(FieldErrors),

    #[error("database error: {0}")]
    Database(anyhow::Error),
}

impl From<anyhow::Error> for ServiceError {
    fn from(err: anyhow::Error) -> Self {
        ServiceError::Database(err)
    }
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        ServiceError::NotFound { entity, id }
    }
}
