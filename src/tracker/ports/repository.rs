//! Error type shared by the tracker repository ports.

use crate::tracker::domain::{
    EntityKind, ProjectId, SprintId, StatusId, StatusRank, TaskId, TrackerDomainError,
    WorkflowError,
};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Result type for tracker repository operations.
pub type TrackerRepositoryResult<T> = Result<T, TrackerRepositoryError>;

/// Errors returned by tracker repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TrackerRepositoryError {
    /// An entity with the same identifier already exists.
    #[error("duplicate {0} identifier: {1}")]
    Duplicate(EntityKind, Uuid),

    /// Another status of the project already holds the rank.
    #[error("project {project_id} already has a status at rank {rank}")]
    DuplicateStatusRank {
        /// Project whose workflow holds the rank.
        project_id: ProjectId,
        /// Contested rank.
        rank: StatusRank,
    },

    /// The project was not found.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The sprint was not found.
    #[error("sprint not found: {0}")]
    SprintNotFound(SprintId),

    /// The status was not found.
    #[error("status not found: {0}")]
    StatusNotFound(StatusId),

    /// The task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// Stored data does not fit the project's ordered workflow.
    #[error(transparent)]
    InvalidState(#[from] WorkflowError),

    /// A value computed inside the store broke a domain rule.
    #[error(transparent)]
    Rejected(#[from] TrackerDomainError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TrackerRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Returns `true` for any of the not-found variants.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ProjectNotFound(_)
                | Self::SprintNotFound(_)
                | Self::StatusNotFound(_)
                | Self::TaskNotFound(_)
        )
    }
}
