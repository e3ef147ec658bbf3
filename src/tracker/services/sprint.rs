//! Sprint lifecycle.

use super::{TrackerServiceError, TrackerServiceResult};
use crate::account::domain::UserId;
use crate::tracker::{
    domain::{EntityKind, ItemName, ProjectId, ScheduleEdit, Sprint, SprintId},
    ports::{ProjectRepository, SprintRepository, TrackerRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info};

/// Request payload for creating a sprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSprintRequest {
    project_id: ProjectId,
    name: String,
    description: Option<String>,
    finish_by: Option<DateTime<Utc>>,
    author: Option<UserId>,
}

impl CreateSprintRequest {
    /// Creates a request for a sprint in `project_id`.
    #[must_use]
    pub fn new(project_id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            project_id,
            name: name.into(),
            description: None,
            finish_by: None,
            author: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub const fn with_finish_by(mut self, finish_by: DateTime<Utc>) -> Self {
        self.finish_by = Some(finish_by);
        self
    }

    /// Sets the creating user.
    #[must_use]
    pub const fn with_author(mut self, author: UserId) -> Self {
        self.author = Some(author);
        self
    }
}

/// Sprint lifecycle service.
#[derive(Clone)]
pub struct SprintService<S, C>
where
    S: ProjectRepository + SprintRepository,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> SprintService<S, C>
where
    S: ProjectRepository + SprintRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new sprint service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Creates a sprint inside an existing project.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError`] when the name is invalid, the project
    /// does not exist, or the repository rejects persistence.
    pub async fn create(&self, request: CreateSprintRequest) -> TrackerServiceResult<Sprint> {
        let name = ItemName::new(EntityKind::Sprint, request.name)?;
        if self.store.find_project(request.project_id).await?.is_none() {
            return Err(TrackerRepositoryError::ProjectNotFound(request.project_id).into());
        }
        let sprint = Sprint::new(
            request.project_id,
            name,
            request.description,
            request.finish_by,
            request.author,
            &*self.clock,
        );
        self.store.store_sprint(&sprint).await?;
        info!(sprint_id = %sprint.id(), project_id = %sprint.project_id(), "sprint created");
        Ok(sprint)
    }

    /// Applies `edit` to a sprint on behalf of `editor`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError`] when the sprint does not exist or the
    /// repository rejects persistence.
    pub async fn update(
        &self,
        id: SprintId,
        edit: ScheduleEdit,
        editor: Option<UserId>,
    ) -> TrackerServiceResult<Sprint> {
        let mut sprint = self
            .store
            .find_sprint(id)
            .await?
            .ok_or(TrackerServiceError::Repository(
                TrackerRepositoryError::SprintNotFound(id),
            ))?;
        sprint.apply(edit, editor, &*self.clock);
        self.store.update_sprint(&sprint).await?;
        debug!(sprint_id = %id, "sprint updated");
        Ok(sprint)
    }

    /// Finds a sprint by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError::Repository`] when lookup fails.
    pub async fn find(&self, id: SprintId) -> TrackerServiceResult<Option<Sprint>> {
        Ok(self.store.find_sprint(id).await?)
    }

    /// Returns a project's sprints in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError::Repository`] when lookup fails.
    pub async fn list(&self, project_id: ProjectId) -> TrackerServiceResult<Vec<Sprint>> {
        Ok(self.store.list_sprints(project_id).await?)
    }

    /// Deletes a sprint; its tasks stay in the project without a sprint.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError`] when the sprint does not exist or the
    /// repository rejects the delete.
    pub async fn delete(&self, id: SprintId) -> TrackerServiceResult<()> {
        self.store.delete_sprint(id).await?;
        info!(sprint_id = %id, "sprint deleted");
        Ok(())
    }
}
