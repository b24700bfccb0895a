//! File-backed task store.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use super::{remove_task, set_status, NewTask, Task, TaskError, TaskStatus, TaskStore};
use crate::settings::{write_atomic, StorageError};

/// Task store persisted as a JSON array.
///
/// The file is read on every call and rewritten on every mutation, so
/// several processes can share it without a daemon in between.
#[derive(Debug, Clone)]
pub struct JsonTaskStore {
    path: PathBuf,
}

impl JsonTaskStore {
    /// Creates a store backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<Task>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&contents).map_err(|source| StorageError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(tasks).map_err(|source| StorageError::Malformed {
            path: self.path.clone(),
            source,
        })?;

        write_atomic(&self.path, &json)?;
        debug!("Saved {} tasks to {:?}", tasks.len(), self.path);
        Ok(())
    }
}

impl TaskStore for JsonTaskStore {
    fn list(&self) -> Result<Vec<Task>, TaskError> {
        Ok(self.load()?)
    }

    fn create(&mut self, new_task: NewTask) -> Result<Task, TaskError> {
        let mut tasks = self.load()?;
        let task = new_task.into_task()?;
        tasks.push(task.clone());
        self.save(&tasks)?;
        Ok(task)
    }

    fn update_status(&mut self, id: Uuid, status: TaskStatus) -> Result<bool, TaskError> {
        let mut tasks = self.load()?;
        if !set_status(&mut tasks, id, status) {
            return Ok(false);
        }
        self.save(&tasks)?;
        Ok(true)
    }

    fn remove(&mut self, id: Uuid) -> Result<bool, TaskError> {
        let mut tasks = self.load()?;
        if !remove_task(&mut tasks, id) {
            return Ok(false);
        }
        self.save(&tasks)?;
        Ok(true)
    }
}
