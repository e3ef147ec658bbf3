//! Status sequencer: moves tasks through their project's ordered workflow
//! and reorders the workflow itself.

use super::TaskNotificationService;
use crate::account::{domain::UserId, ports::UserDirectory};
use crate::tracker::{
    domain::{
        StatusId, StatusSwap, Step, SwapDirection, TaskId, TaskNotice, TaskStep, WorkflowError,
    },
    ports::{Notifier, StatusRepository, TrackerRepositoryError, WorkflowRepository},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors returned by [`StatusSequencer`] operations.
#[derive(Debug, Clone, Error)]
pub enum SequencerError {
    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The status does not exist.
    #[error("status not found: {0}")]
    StatusNotFound(StatusId),

    /// The task or status has no position in its project's workflow.
    #[error(transparent)]
    InvalidState(WorkflowError),

    /// Any other repository failure.
    #[error(transparent)]
    Repository(TrackerRepositoryError),
}

impl SequencerError {
    /// Returns `true` when the task or status did not resolve.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::TaskNotFound(_) | Self::StatusNotFound(_))
    }

    /// Returns `true` when stored data has no position in the workflow.
    #[must_use]
    pub const fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }
}

impl From<TrackerRepositoryError> for SequencerError {
    fn from(err: TrackerRepositoryError) -> Self {
        match err {
            TrackerRepositoryError::TaskNotFound(id) => Self::TaskNotFound(id),
            TrackerRepositoryError::StatusNotFound(id) => Self::StatusNotFound(id),
            TrackerRepositoryError::InvalidState(workflow) => Self::InvalidState(workflow),
            other => Self::Repository(other),
        }
    }
}

/// Result type for sequencer operations.
pub type SequencerResult<T> = Result<T, SequencerError>;

/// Advances, retreats and reorders within per-project status workflows.
///
/// Moves are delegated to the [`WorkflowRepository`], which performs each
/// read-compute-write as one atomic unit. A task that actually moved is
/// handed to the notification step after the move is stored.
pub struct StatusSequencer<S, C, D, N>
where
    S: WorkflowRepository + StatusRepository,
    C: Clock + Send + Sync,
    D: UserDirectory,
    N: Notifier,
{
    store: Arc<S>,
    clock: Arc<C>,
    notifications: TaskNotificationService<S, D, N>,
}

impl<S, C, D, N> StatusSequencer<S, C, D, N>
where
    S: WorkflowRepository + StatusRepository,
    C: Clock + Send + Sync,
    D: UserDirectory,
    N: Notifier,
{
    /// Creates a new sequencer.
    #[must_use]
    pub const fn new(
        store: Arc<S>,
        clock: Arc<C>,
        notifications: TaskNotificationService<S, D, N>,
    ) -> Self {
        Self {
            store,
            clock,
            notifications,
        }
    }

    /// Moves a task to the next status of its project's workflow.
    ///
    /// A task already at the last status is returned as
    /// [`TaskStep::Unchanged`].
    ///
    /// # Errors
    ///
    /// Returns [`SequencerError::TaskNotFound`] when the task does not exist
    /// and [`SequencerError::InvalidState`] when its status is not part of
    /// the workflow.
    pub async fn advance(
        &self,
        task_id: TaskId,
        acting_user: Option<UserId>,
    ) -> SequencerResult<TaskStep> {
        self.step(task_id, Step::Forward, acting_user).await
    }

    /// Moves a task to the previous status of its project's workflow.
    ///
    /// A task already at the first status is returned as
    /// [`TaskStep::Unchanged`].
    ///
    /// # Errors
    ///
    /// Returns [`SequencerError::TaskNotFound`] when the task does not exist
    /// and [`SequencerError::InvalidState`] when its status is not part of
    /// the workflow.
    pub async fn retreat(
        &self,
        task_id: TaskId,
        acting_user: Option<UserId>,
    ) -> SequencerResult<TaskStep> {
        self.step(task_id, Step::Backward, acting_user).await
    }

    /// Trades the workflow position of a status with its neighbour.
    ///
    /// Both statuses keep their identity and name; only their ranks are
    /// exchanged. A status already at the boundary in `direction` is
    /// returned as [`StatusSwap::Unchanged`].
    ///
    /// # Errors
    ///
    /// Returns [`SequencerError::StatusNotFound`] when the status does not
    /// exist.
    pub async fn swap_priority(
        &self,
        status_id: StatusId,
        direction: SwapDirection,
    ) -> SequencerResult<StatusSwap> {
        let outcome = self
            .store
            .swap_status(status_id, direction, self.clock.utc())
            .await?;
        match &outcome {
            StatusSwap::Swapped { moved, displaced } => info!(
                status_id = %moved.id(),
                displaced_id = %displaced.id(),
                direction = direction.as_str(),
                rank = %moved.rank(),
                "status priority swapped"
            ),
            StatusSwap::Unchanged(status) => debug!(
                status_id = %status.id(),
                direction = direction.as_str(),
                "status already at workflow boundary"
            ),
        }
        Ok(outcome)
    }

    async fn step(
        &self,
        task_id: TaskId,
        step: Step,
        acting_user: Option<UserId>,
    ) -> SequencerResult<TaskStep> {
        let outcome = self
            .store
            .step_task(task_id, step, acting_user, self.clock.utc())
            .await?;
        match &outcome {
            TaskStep::Moved { before, after } => {
                info!(
                    task_id = %task_id,
                    step = ?step,
                    from = ?before.status_id(),
                    to = ?after.status_id(),
                    "task moved through workflow"
                );
                if let Some(notice) = TaskNotice::from_change(before, after) {
                    self.notifications.dispatch(&notice).await;
                }
            }
            TaskStep::Unchanged(_) => {
                debug!(task_id = %task_id, step = ?step, "task already at workflow boundary");
            }
        }
        Ok(outcome)
    }
}
