use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use crate::models::{Status, Task, TaskDraft, TaskId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("duplicate task id {0}")]
    DuplicateId(TaskId),
}

/// The live task collection, most recently created first.
///
/// All mutations go through this type. Operations on an unknown id leave the
/// collection untouched and return `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskBoard {
    tasks: Vec<Task>,
}

impl TaskBoard {
    pub fn new() -> Self {
        TaskBoard::default()
    }

    /// Wraps an existing collection, rejecting repeated ids.
    pub fn from_tasks(tasks: Vec<Task>) -> Result<Self, BoardError> {
        let mut seen = HashSet::with_capacity(tasks.len());
        for t in &tasks {
            if !seen.insert(t.id) {
                return Err(BoardError::DuplicateId(t.id));
            }
        }
        Ok(TaskBoard { tasks })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// One past the largest id, or the smallest free id once that would overflow.
    fn next_id(&self) -> TaskId {
        let max = self.tasks.iter().map(|t| t.id.0).max().unwrap_or(0);
        if let Some(id) = max.checked_add(1) {
            return TaskId(id);
        }
        let used: HashSet<u64> = self.tasks.iter().map(|t| t.id.0).collect();
        TaskId((1..).find(|id| !used.contains(id)).unwrap_or(0))
    }

    /// Adds a task built from `draft` at the front of the collection.
    pub fn create(&mut self, draft: TaskDraft) -> &Task {
        let id = self.next_id();
        debug!(%id, title = %draft.title, "creating task");
        self.tasks.insert(0, Task::from_draft(id, draft));
        &self.tasks[0]
    }

    /// Replaces every field of the task except its id.
    pub fn edit(&mut self, id: TaskId, draft: TaskDraft) -> Option<&Task> {
        let task = self.get_mut(id)?;
        debug!(%id, "editing task");
        *task = Task::from_draft(id, draft);
        Some(task)
    }

    /// Flips completion. Completing sets status to `completed`, reopening sets `todo`.
    pub fn toggle_complete(&mut self, id: TaskId) -> Option<&Task> {
        let task = self.get_mut(id)?;
        task.status = if task.is_completed() {
            Status::Todo
        } else {
            Status::Completed
        };
        debug!(%id, status = task.status.as_str(), "toggled completion");
        Some(task)
    }

    /// Removes the task and hands it back.
    pub fn delete(&mut self, id: TaskId) -> Option<Task> {
        let pos = self.tasks.iter().position(|t| t.id == id)?;
        debug!(%id, "deleting task");
        Some(self.tasks.remove(pos))
    }

    /// Replaces the collaborator list wholesale.
    pub fn update_shares(&mut self, id: TaskId, emails: Vec<String>) -> Option<&Task> {
        let task = self.get_mut(id)?;
        debug!(%id, count = emails.len(), "updating shares");
        task.shared_with = emails;
        Some(task)
    }
}
