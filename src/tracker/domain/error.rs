//! Error types for tracker domain validation and workflow membership.

use super::{ProjectId, StatusId, TaskId};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Kinds of tracked entities, used to label validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A project.
    Project,
    /// A sprint within a project.
    Sprint,
    /// A workflow status within a project.
    Status,
    /// A task within a project.
    Task,
}

impl EntityKind {
    /// Returns a lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Sprint => "sprint",
            Self::Status => "status",
            Self::Task => "task",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned while constructing or editing tracker values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrackerDomainError {
    /// A name is empty after trimming.
    #[error("{0} name must not be empty")]
    EmptyName(EntityKind),

    /// A name exceeds the storage limit.
    #[error("{kind} name exceeds {max} characters")]
    NameTooLong {
        /// Entity whose name was rejected.
        kind: EntityKind,
        /// Maximum permitted length in characters.
        max: usize,
    },

    /// A referenced sprint or status belongs to a different project.
    #[error("{kind} {reference} belongs to project {actual}, expected project {expected}")]
    CrossProjectReference {
        /// Kind of the referenced entity.
        kind: EntityKind,
        /// Identifier of the referenced entity.
        reference: Uuid,
        /// Project the task belongs to.
        expected: ProjectId,
        /// Project the referenced entity belongs to.
        actual: ProjectId,
    },

    /// A status rank cannot be represented in storage.
    #[error("status rank {0} exceeds the storable range")]
    RankOutOfRange(u64),
}

/// Workflow membership failures.
///
/// These indicate that a task or status does not fit the ordered status
/// list it is being moved through. They are only reachable when stored data
/// violates the per-project invariant, and sequencer operations reject them
/// instead of guessing a position.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkflowError {
    /// The task has no current status, so it has no position in the order.
    #[error("task {0} has no status to move from")]
    TaskWithoutStatus(TaskId),

    /// The status is not a member of the project's ordered list.
    #[error("status {status_id} is not part of the workflow of project {project_id}")]
    StatusOutsideWorkflow {
        /// Status that could not be located.
        status_id: StatusId,
        /// Project whose ordered list was scanned.
        project_id: ProjectId,
    },
}

/// Error returned while parsing a swap direction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown swap direction: {0}, expected 'up' or 'down'")]
pub struct ParseSwapDirectionError(pub String);
