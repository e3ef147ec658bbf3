//! Repository port for atomic workflow moves.

use super::TrackerRepositoryResult;
use crate::account::domain::UserId;
use crate::tracker::domain::{StatusId, StatusSwap, Step, SwapDirection, TaskId, TaskStep};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Moves through a project's ordered status list.
///
/// Each method reads the project's ordered status list and the acted-upon
/// row, computes the move with [`crate::tracker::domain::StatusOrder`], and
/// writes the result as one atomic unit. Concurrent calls against the same
/// project never compute positions from a stale snapshot.
#[async_trait]
pub trait WorkflowRepository: Send + Sync {
    /// Moves a task one status in `step` direction within its project.
    ///
    /// At the boundary the task is left untouched and returned as
    /// [`TaskStep::Unchanged`].
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerRepositoryError::TaskNotFound`] when the task
    /// does not exist, or [`super::TrackerRepositoryError::InvalidState`]
    /// when its status is missing from the project's workflow.
    async fn step_task(
        &self,
        task_id: TaskId,
        step: Step,
        editor: Option<UserId>,
        at: DateTime<Utc>,
    ) -> TrackerRepositoryResult<TaskStep>;

    /// Exchanges the rank of a status with its neighbour in `direction`.
    ///
    /// At the boundary nothing is written and the status is returned as
    /// [`StatusSwap::Unchanged`].
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerRepositoryError::StatusNotFound`] when the
    /// status does not exist.
    async fn swap_status(
        &self,
        status_id: StatusId,
        direction: SwapDirection,
        at: DateTime<Utc>,
    ) -> TrackerRepositoryResult<StatusSwap>;
}
