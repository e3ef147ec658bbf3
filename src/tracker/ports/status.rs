//! Repository port for workflow statuses.

use super::TrackerRepositoryResult;
use crate::tracker::domain::{ProjectId, Status, StatusId, StatusOrder};
use async_trait::async_trait;

/// Status persistence contract.
///
/// Rank changes go through [`super::WorkflowRepository`] so they happen
/// atomically with the read of the ordered list.
#[async_trait]
pub trait StatusRepository: Send + Sync {
    /// Stores a new status.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerRepositoryError::ProjectNotFound`] when the
    /// owning project does not exist, or
    /// [`super::TrackerRepositoryError::DuplicateStatusRank`] when the rank
    /// is taken.
    async fn store_status(&self, status: &Status) -> TrackerRepositoryResult<()>;

    /// Stores a new status after the last status of its project.
    ///
    /// The rank carried by `status` is ignored. The next free rank is
    /// computed and the row inserted as one atomic unit, so concurrent
    /// appends to one project never contend for the same rank.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerRepositoryError::ProjectNotFound`] when the
    /// owning project does not exist, or
    /// [`super::TrackerRepositoryError::Rejected`] when the workflow has no
    /// storable rank left.
    async fn append_status(&self, status: &Status) -> TrackerRepositoryResult<Status>;

    /// Persists a status's name and update timestamp. The rank is left as
    /// stored.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerRepositoryError::StatusNotFound`] when the
    /// status does not exist.
    async fn rename_status(&self, status: &Status) -> TrackerRepositoryResult<()>;

    /// Finds a status by identifier.
    async fn find_status(&self, id: StatusId) -> TrackerRepositoryResult<Option<Status>>;

    /// Returns a project's statuses in workflow order.
    async fn status_order(&self, project_id: ProjectId) -> TrackerRepositoryResult<StatusOrder>;

    /// Deletes a status, detaching tasks that reference it.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerRepositoryError::StatusNotFound`] when the
    /// status does not exist.
    async fn delete_status(&self, id: StatusId) -> TrackerRepositoryResult<()>;
}
