//! Repository port for projects.

use super::TrackerRepositoryResult;
use crate::tracker::domain::{Project, ProjectId, Status};
use async_trait::async_trait;

/// Project persistence contract.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Stores a new project.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerRepositoryError::Duplicate`] when the project
    /// ID already exists.
    async fn store_project(&self, project: &Project) -> TrackerRepositoryResult<()>;

    /// Stores a new project together with its initial workflow.
    ///
    /// Either the project and every status are stored, or nothing is.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerRepositoryError::Duplicate`] when the project
    /// or a status ID already exists, or
    /// [`super::TrackerRepositoryError::DuplicateStatusRank`] when two
    /// statuses share a rank.
    async fn store_project_with_workflow(
        &self,
        project: &Project,
        statuses: &[Status],
    ) -> TrackerRepositoryResult<()>;

    /// Persists changes to an existing project.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerRepositoryError::ProjectNotFound`] when the
    /// project does not exist.
    async fn update_project(&self, project: &Project) -> TrackerRepositoryResult<()>;

    /// Finds a project by identifier.
    async fn find_project(&self, id: ProjectId) -> TrackerRepositoryResult<Option<Project>>;

    /// Returns every project in creation order.
    async fn list_projects(&self) -> TrackerRepositoryResult<Vec<Project>>;

    /// Deletes a project together with its sprints, statuses and tasks.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerRepositoryError::ProjectNotFound`] when the
    /// project does not exist.
    async fn delete_project(&self, id: ProjectId) -> TrackerRepositoryResult<()>;
}
