//! Task list and kanban board.
//!
//! Tasks are an ordered collection behind the [`TaskStore`] trait:
//!
//! - [`JsonTaskStore`]: persists the whole list to a JSON file on every change
//! - [`MemoryTaskStore`]: in-memory, for tests
//!
//! The kanban [`Board`] groups tasks by status, and [`apply_drop`] turns a
//! card dropped on a column into a status update. Updating or removing an
//! unknown id is a no-op.

mod board;
mod json_store;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::settings::StorageError;

pub use self::board::{apply_drop, Board, Column, COLUMN_IDS};
pub use self::json_store::JsonTaskStore;

/// Category given to tasks created without one.
pub const DEFAULT_CATEGORY: &str = "work";

// ============================================================================
// TaskError
// ============================================================================

/// Task store errors.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("No task matches '{0}'")]
    NotFound(String),

    #[error("'{0}' matches more than one task")]
    Ambiguous(String),

    #[error("Task title cannot be empty")]
    EmptyTitle,
}

// ============================================================================
// Priority / TaskStatus
// ============================================================================

/// How urgent a task is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown priority '{}' (low, medium, high)", other)),
        }
    }
}

/// Where a task sits on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// All statuses in board order.
    pub const ALL: [TaskStatus; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// Returns the stored identifier, which doubles as the column id.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }

    /// Returns the column heading.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Todo => "To do",
            Self::InProgress => "In progress",
            Self::Done => "Done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "todo" => Ok(Self::Todo),
            "in-progress" | "doing" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(format!(
                "unknown status '{}' (todo, in-progress, done)",
                other
            )),
        }
    }
}

// ============================================================================
// Task
// ============================================================================

/// A task on the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Returns the first eight characters of the id, enough to address it.
    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }

    /// Returns true if the due date lies before `today` and the task is not done.
    ///
    /// A task due today is not overdue yet.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != TaskStatus::Done && self.due_date.is_some_and(|due| due < today)
    }
}

/// Caller-provided fields of a new task; the store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: TaskStatus,
    pub category: String,
    pub due_date: Option<NaiveDate>,
}

impl NewTask {
    /// Creates a medium-priority `todo` task in the default category.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            status: TaskStatus::default(),
            category: DEFAULT_CATEGORY.to_string(),
            due_date: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = due_date;
        self
    }

    /// Stamps the task with a fresh id and the current time.
    fn into_task(self) -> Result<Task, TaskError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(TaskError::EmptyTitle);
        }

        Ok(Task {
            id: Uuid::new_v4(),
            title,
            description: self.description,
            priority: self.priority,
            status: self.status,
            category: self.category,
            due_date: self.due_date,
            created_at: Utc::now(),
        })
    }
}

// ============================================================================
// TaskStore
// ============================================================================

/// An ordered, persisted task collection.
pub trait TaskStore {
    /// Returns every task in insertion order.
    fn list(&self) -> Result<Vec<Task>, TaskError>;

    /// Appends a new task and returns it.
    fn create(&mut self, new_task: NewTask) -> Result<Task, TaskError>;

    /// Sets the status of `id`. Returns false if no task has that id.
    fn update_status(&mut self, id: Uuid, status: TaskStatus) -> Result<bool, TaskError>;

    /// Deletes `id`. Returns false if no task has that id.
    fn remove(&mut self, id: Uuid) -> Result<bool, TaskError>;
}

/// Resolves a full id or a unique id prefix to the id of a stored task.
///
/// # Errors
///
/// Returns [`TaskError::NotFound`] or [`TaskError::Ambiguous`] when the
/// needle does not pick out exactly one stored task.
pub fn resolve_id<T: TaskStore + ?Sized>(store: &T, needle: &str) -> Result<Uuid, TaskError> {
    let needle = needle.trim().to_ascii_lowercase();
    if let Ok(id) = Uuid::parse_str(&needle) {
        return if store.list()?.iter().any(|task| task.id == id) {
            Ok(id)
        } else {
            Err(TaskError::NotFound(needle))
        };
    }

    let needle_simple = needle.replace('-', "");
    if needle_simple.is_empty() {
        return Err(TaskError::NotFound(needle));
    }

    let mut matches = store
        .list()?
        .into_iter()
        .filter(|task| task.id.simple().to_string().starts_with(&needle_simple));

    match (matches.next(), matches.next()) {
        (Some(task), None) => Ok(task.id),
        (Some(_), Some(_)) => Err(TaskError::Ambiguous(needle)),
        (None, _) => Err(TaskError::NotFound(needle)),
    }
}

// ============================================================================
// MemoryTaskStore
// ============================================================================

/// In-memory task store.
#[derive(Debug, Clone, Default)]
pub struct MemoryTaskStore {
    tasks: Vec<Task>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskStore for MemoryTaskStore {
    fn list(&self) -> Result<Vec<Task>, TaskError> {
        Ok(self.tasks.clone())
    }

    fn create(&mut self, new_task: NewTask) -> Result<Task, TaskError> {
        let task = new_task.into_task()?;
        self.tasks.push(task.clone());
        Ok(task)
    }

    fn update_status(&mut self, id: Uuid, status: TaskStatus) -> Result<bool, TaskError> {
        Ok(set_status(&mut self.tasks, id, status))
    }

    fn remove(&mut self, id: Uuid) -> Result<bool, TaskError> {
        Ok(remove_task(&mut self.tasks, id))
    }
}

fn set_status(tasks: &mut [Task], id: Uuid, status: TaskStatus) -> bool {
    match tasks.iter_mut().find(|task| task.id == id) {
        Some(task) => {
            task.status = status;
            true
        }
        None => false,
    }
}

fn remove_task(tasks: &mut Vec<Task>, id: Uuid) -> bool {
    let before = tasks.len();
    tasks.retain(|task| task.id != id);
    tasks.len() != before
}
