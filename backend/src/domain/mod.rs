//! Business logic for the chore tracker: one service per entity, each
//! validating form input before it reaches the store and shaping the
//! result objects the presentation layer consumes.

pub mod child_service;
pub mod chore_service;
pub mod error;
pub mod task_service;

pub use child_service::ChildService;
pub use chore_service::ChoreService;
pub use error::ServiceError;
pub use task_service::TaskService;
