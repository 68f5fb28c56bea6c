use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::board::{BoardError, TaskBoard};
use crate::models::Task;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access task store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("task store {path} is not valid: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("task store {path} is inconsistent: {source}")]
    Board {
        path: PathBuf,
        #[source]
        source: BoardError,
    },
}

/// Returns the default path to the tasks database file (`tasks.json`).
///
/// `~/.local/share/taskdash/tasks.json` on Linux, `./tasks.json` when no data
/// directory is known.
pub fn default_db_path() -> PathBuf {
    let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    p.push("taskdash");
    p.push("tasks.json");
    p
}

/// JSON file holding the task collection in creation order.
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TaskStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Loads all tasks from the storage file.
    ///
    /// Returns an empty board if the file does not exist yet.
    pub fn load(&self) -> Result<TaskBoard, StoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no task store yet");
            return Ok(TaskBoard::new());
        }
        let mut f = OpenOptions::new()
            .read(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;
        let mut s = String::new();
        f.read_to_string(&mut s).map_err(|e| self.io_err(e))?;
        if s.trim().is_empty() {
            return Ok(TaskBoard::new());
        }
        let tasks: Vec<Task> = serde_json::from_str(&s).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;
        TaskBoard::from_tasks(tasks).map_err(|source| StoreError::Board {
            path: self.path.clone(),
            source,
        })
    }

    /// Saves the given board to the storage file.
    ///
    /// Overwrites the existing file, creating parent directories as needed.
    pub fn save(&self, board: &TaskBoard) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
            }
        }
        let s = serde_json::to_string_pretty(board.tasks()).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;
        f.write_all(s.as_bytes()).map_err(|e| self.io_err(e))?;
        info!(path = %self.path.display(), tasks = board.len(), "saved tasks");
        Ok(())
    }

    /// Deletes the tasks database file.
    pub fn delete(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| self.io_err(e))?;
        }
        Ok(())
    }
}
