//! Repository port for tasks.

use super::TrackerRepositoryResult;
use crate::account::domain::UserId;
use crate::tracker::domain::{Task, TaskEdit, TaskFilter, TaskId, TaskRevision};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerRepositoryError::Duplicate`] when the task ID
    /// already exists, or a not-found variant when the project, sprint or
    /// status it references does not exist.
    async fn store_task(&self, task: &Task) -> TrackerRepositoryResult<()>;

    /// Applies `edit` to the stored task on behalf of `editor`.
    ///
    /// The read, the edit and the write form one atomic unit, so a workflow
    /// move committed in between is never overwritten. The returned
    /// revision holds the task exactly as stored before and after the edit.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerRepositoryError::TaskNotFound`] when the task
    /// does not exist, or a not-found variant when the edit references a
    /// sprint or status that does not exist.
    async fn apply_task_edit(
        &self,
        id: TaskId,
        edit: TaskEdit,
        editor: Option<UserId>,
        at: DateTime<Utc>,
    ) -> TrackerRepositoryResult<TaskRevision>;

    /// Finds a task by identifier.
    async fn find_task(&self, id: TaskId) -> TrackerRepositoryResult<Option<Task>>;

    /// Returns tasks matching `filter` in creation order.
    async fn list_tasks(&self, filter: &TaskFilter) -> TrackerRepositoryResult<Vec<Task>>;

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerRepositoryError::TaskNotFound`] when the task
    /// does not exist.
    async fn delete_task(&self, id: TaskId) -> TrackerRepositoryResult<()>;
}
