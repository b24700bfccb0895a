//! Kanban board.

use tracing::debug;
use uuid::Uuid;

use super::{Task, TaskError, TaskStatus, TaskStore};

/// Column identifiers in board order.
pub const COLUMN_IDS: [&str; 3] = ["todo", "in-progress", "done"];

/// One board column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub status: TaskStatus,
    pub tasks: Vec<Task>,
}

impl Column {
    /// Returns the column id a card can be dropped on.
    pub fn id(&self) -> &'static str {
        self.status.as_str()
    }

    pub fn title(&self) -> &'static str {
        self.status.label()
    }
}

/// Tasks grouped by status, preserving list order within each column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    columns: Vec<Column>,
}

impl Board {
    /// Groups `tasks` into the three status columns.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut columns: Vec<Column> = TaskStatus::ALL
            .iter()
            .map(|&status| Column {
                status,
                tasks: Vec::new(),
            })
            .collect();

        for task in tasks {
            if let Some(column) = columns.iter_mut().find(|c| c.status == task.status) {
                column.tasks.push(task);
            }
        }

        Self { columns }
    }

    /// Builds the board from the current contents of `store`.
    pub fn load<T: TaskStore + ?Sized>(store: &T) -> Result<Self, TaskError> {
        Ok(Self::from_tasks(store.list()?))
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, status: TaskStatus) -> Option<&Column> {
        self.columns.iter().find(|c| c.status == status)
    }

    /// Returns true if no column holds a task.
    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(|c| c.tasks.is_empty())
    }
}

/// Moves `dragged_id` to the column `target_column_id`.
///
/// Unknown column ids, unknown tasks and drops onto the task's current
/// column change nothing. Returns true if a status was updated.
pub fn apply_drop<T: TaskStore + ?Sized>(
    store: &mut T,
    dragged_id: Uuid,
    target_column_id: &str,
) -> Result<bool, TaskError> {
    let Some(target) = TaskStatus::ALL
        .into_iter()
        .find(|status| status.as_str() == target_column_id)
    else {
        debug!("Ignoring drop on unknown column '{}'", target_column_id);
        return Ok(false);
    };

    let current = store
        .list()?
        .into_iter()
        .find(|task| task.id == dragged_id)
        .map(|task| task.status);

    match current {
        Some(status) if status != target => store.update_status(dragged_id, target),
        _ => Ok(false),
    }
}
