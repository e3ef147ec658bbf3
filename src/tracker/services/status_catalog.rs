//! Status catalogue management: creating, renaming, listing and deleting
//! the statuses of a project's workflow.
//!
//! Reordering lives in [`super::StatusSequencer`].

use super::{TrackerServiceError, TrackerServiceResult};
use crate::account::domain::UserId;
use crate::tracker::{
    domain::{EntityKind, ItemName, ProjectId, Status, StatusId, StatusOrder, StatusRank},
    ports::{ProjectRepository, StatusRepository, TrackerRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

/// Status catalogue service.
#[derive(Clone)]
pub struct StatusCatalogService<S, C>
where
    S: ProjectRepository + StatusRepository,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> StatusCatalogService<S, C>
where
    S: ProjectRepository + StatusRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new status catalogue service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Appends a status to the end of a project's workflow.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError`] when the name is invalid, the project
    /// does not exist, or the repository rejects persistence.
    pub async fn create(
        &self,
        project_id: ProjectId,
        name: &str,
        author: Option<UserId>,
    ) -> TrackerServiceResult<Status> {
        let status_name = ItemName::new(EntityKind::Status, name)?;
        if self.store.find_project(project_id).await?.is_none() {
            return Err(TrackerRepositoryError::ProjectNotFound(project_id).into());
        }
        // The store assigns the rank when it appends the status.
        let pending = Status::new(
            project_id,
            status_name,
            StatusRank::FIRST,
            author,
            &*self.clock,
        );
        let status = self.store.append_status(&pending).await?;
        info!(
            status_id = %status.id(),
            project_id = %project_id,
            rank = %status.rank(),
            "status appended"
        );
        Ok(status)
    }

    /// Renames a status without moving it.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError`] when the name is invalid, the status
    /// does not exist, or the repository rejects persistence.
    pub async fn rename(&self, id: StatusId, name: &str) -> TrackerServiceResult<Status> {
        let status_name = ItemName::new(EntityKind::Status, name)?;
        let mut status = self
            .store
            .find_status(id)
            .await?
            .ok_or(TrackerServiceError::Repository(
                TrackerRepositoryError::StatusNotFound(id),
            ))?;
        status.rename(status_name, &*self.clock);
        self.store.rename_status(&status).await?;
        Ok(status)
    }

    /// Finds a status by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError::Repository`] when lookup fails.
    pub async fn find(&self, id: StatusId) -> TrackerServiceResult<Option<Status>> {
        Ok(self.store.find_status(id).await?)
    }

    /// Returns a project's statuses in workflow order.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError::Repository`] when lookup fails.
    pub async fn list(&self, project_id: ProjectId) -> TrackerServiceResult<StatusOrder> {
        Ok(self.store.status_order(project_id).await?)
    }

    /// Deletes a status; tasks that sat on it are left without a status.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError`] when the status does not exist or the
    /// repository rejects the delete.
    pub async fn delete(&self, id: StatusId) -> TrackerServiceResult<()> {
        self.store.delete_status(id).await?;
        info!(status_id = %id, "status deleted");
        Ok(())
    }
}
