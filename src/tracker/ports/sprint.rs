//! Repository port for sprints.

use super::TrackerRepositoryResult;
use crate::tracker::domain::{ProjectId, Sprint, SprintId};
use async_trait::async_trait;

/// Sprint persistence contract.
#[async_trait]
pub trait SprintRepository: Send + Sync {
    /// Stores a new sprint.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerRepositoryError::ProjectNotFound`] when the
    /// owning project does not exist.
    async fn store_sprint(&self, sprint: &Sprint) -> TrackerRepositoryResult<()>;

    /// Persists changes to an existing sprint.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerRepositoryError::SprintNotFound`] when the
    /// sprint does not exist.
    async fn update_sprint(&self, sprint: &Sprint) -> TrackerRepositoryResult<()>;

    /// Finds a sprint by identifier.
    async fn find_sprint(&self, id: SprintId) -> TrackerRepositoryResult<Option<Sprint>>;

    /// Returns a project's sprints in creation order.
    async fn list_sprints(&self, project_id: ProjectId) -> TrackerRepositoryResult<Vec<Sprint>>;

    /// Deletes a sprint, detaching its tasks.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerRepositoryError::SprintNotFound`] when the
    /// sprint does not exist.
    async fn delete_sprint(&self, id: SprintId) -> TrackerRepositoryResult<()>;
}
