use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A child who can be assigned chores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Inactive children are kept for history but hidden from default pickers
    pub active: bool,
}

impl Child {
    /// Space-joined first and last name, used in headings and messages
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A task that can be assigned to children, worth a number of points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub name: String,
    /// Points awarded when a chore for this task is completed (never negative)
    pub points: i64,
    pub active: bool,
}

/// An assignment of one task to one child with a due date and completion flag.
///
/// `child_name` and `task_name` are joined in at query time so the
/// presentation layer never needs a second lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chore {
    pub id: i64,
    pub child_id: i64,
    pub task_id: i64,
    pub child_name: String,
    pub task_name: String,
    pub due_on: NaiveDate,
    pub completed: bool,
}

impl Chore {
    /// Display status derived from the completion flag
    pub fn status(&self) -> &'static str {
        if self.completed {
            "Completed"
        } else {
            "Pending"
        }
    }
}

fn default_true() -> bool {
    true
}

/// Form payload for creating or editing a child
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildForm {
    pub first_name: String,
    pub last_name: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl Default for ChildForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            active: true,
        }
    }
}

impl From<&Child> for ChildForm {
    fn from(child: &Child) -> Self {
        Self {
            first_name: child.first_name.clone(),
            last_name: child.last_name.clone(),
            active: child.active,
        }
    }
}

/// Form payload for creating or editing a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskForm {
    pub name: String,
    #[serde(default)]
    pub points: i64,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            points: 0,
            active: true,
        }
    }
}

impl From<&Task> for TaskForm {
    fn from(task: &Task) -> Self {
        Self {
            name: task.name.clone(),
            points: task.points,
            active: task.active,
        }
    }
}

/// Form payload for creating or editing a chore.
///
/// `due_on` stays a raw string here so a malformed date surfaces as a
/// field-level validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChoreForm {
    #[serde(default)]
    pub child_id: i64,
    #[serde(default)]
    pub task_id: i64,
    #[serde(default)]
    pub due_on: String,
    #[serde(default)]
    pub completed: bool,
}

impl From<&Chore> for ChoreForm {
    fn from(chore: &Chore) -> Self {
        Self {
            child_id: chore.child_id,
            task_id: chore.task_id,
            due_on: chore.due_on.to_string(),
            completed: chore.completed,
        }
    }
}

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Collected validation failures for one form submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldErrors {
    pub errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages recorded against one field, in insertion order
    pub fn messages_for(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }
}

/// Query specification for listing children (always alphabetical by
/// last name then first name)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChildQuery {
    pub active_only: bool,
}

/// Query specification for listing tasks (always alphabetical by name)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskQuery {
    pub active_only: bool,
}

/// Sort order for chore listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoreSort {
    /// By due date, ties broken by task name
    #[default]
    Chronological,
    /// By task name alone
    ByTask,
}

/// Filter chores relative to the date the query is evaluated on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueWindow {
    /// Due today or later
    Upcoming,
    /// Due strictly before today
    Past,
}

/// Query specification for listing chores; filters and sort compose
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChoreQuery {
    pub sort: ChoreSort,
    pub completed: Option<bool>,
    pub due: Option<DueWindow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildListResponse {
    pub children: Vec<Child>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreListResponse {
    pub chores: Vec<Chore>,
}

/// Detail view of a child, including points from completed chores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildDetailResponse {
    pub child: Child,
    pub points_earned: i64,
}

/// Result of a successful child create or update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildResponse {
    pub child: Child,
    pub success_message: String,
    /// Where the presentation layer should navigate next
    pub redirect_to: String,
}

/// Result of a successful task create or update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub task: Task,
    pub success_message: String,
    pub redirect_to: String,
}

/// Result of a successful chore create or update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreResponse {
    pub chore: Chore,
    pub success_message: String,
    pub redirect_to: String,
}

/// Result of a successful delete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success_message: String,
    pub redirect_to: String,
}

/// A rejected form submission: the input as submitted plus the
/// per-field errors, ready for redisplay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormRedisplay<F> {
    pub form: F,
    pub errors: FieldErrors,
}
