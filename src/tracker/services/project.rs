//! Project lifecycle, including default workflow seeding.

use super::{TrackerServiceError, TrackerServiceResult};
use crate::account::domain::UserId;
use crate::tracker::{
    domain::{
        DEFAULT_STATUS_NAMES, EntityKind, ItemName, Project, ProjectId, ScheduleEdit, Status,
        StatusRank,
    },
    ports::{ProjectRepository, StatusRepository, TrackerRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info};

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    name: String,
    description: Option<String>,
    finish_by: Option<DateTime<Utc>>,
    author: Option<UserId>,
}

impl CreateProjectRequest {
    /// Creates a request with the required name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
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

/// Project lifecycle service.
#[derive(Clone)]
pub struct ProjectService<S, C>
where
    S: ProjectRepository + StatusRepository,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    default_statuses: Vec<ItemName>,
}

impl<S, C> ProjectService<S, C>
where
    S: ProjectRepository + StatusRepository,
    C: Clock + Send + Sync,
{
    /// Creates a service that seeds [`DEFAULT_STATUS_NAMES`] into new
    /// projects.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        let default_statuses = DEFAULT_STATUS_NAMES
            .iter()
            .filter_map(|name| ItemName::new(EntityKind::Status, *name).ok())
            .collect();
        Self {
            store,
            clock,
            default_statuses,
        }
    }

    /// Replaces the status names seeded into new projects.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError::Domain`] when a name is invalid.
    pub fn with_default_statuses<I, T>(mut self, names: I) -> TrackerServiceResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.default_statuses = names
            .into_iter()
            .map(|name| ItemName::new(EntityKind::Status, name))
            .collect::<Result<_, _>>()?;
        Ok(self)
    }

    /// Returns the status names seeded into new projects, in order.
    #[must_use]
    pub fn default_statuses(&self) -> &[ItemName] {
        &self.default_statuses
    }

    /// Creates a project and seeds its workflow with the default statuses.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError`] when the name is invalid or the
    /// repository rejects persistence.
    pub async fn create(&self, request: CreateProjectRequest) -> TrackerServiceResult<Project> {
        let name = ItemName::new(EntityKind::Project, request.name)?;
        let project = Project::new(
            name,
            request.description,
            request.finish_by,
            request.author,
            &*self.clock,
        );
        let mut workflow = Vec::with_capacity(self.default_statuses.len());
        let mut rank = StatusRank::FIRST;
        for (index, status_name) in self.default_statuses.iter().enumerate() {
            if index > 0 {
                rank = rank.successor()?;
            }
            workflow.push(Status::new(
                project.id(),
                status_name.clone(),
                rank,
                request.author,
                &*self.clock,
            ));
        }
        self.store
            .store_project_with_workflow(&project, &workflow)
            .await?;

        info!(
            project_id = %project.id(),
            seeded_statuses = self.default_statuses.len(),
            "project created"
        );
        Ok(project)
    }

    /// Applies `edit` to a project on behalf of `editor`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError`] when the project does not exist or the
    /// repository rejects persistence.
    pub async fn update(
        &self,
        id: ProjectId,
        edit: ScheduleEdit,
        editor: Option<UserId>,
    ) -> TrackerServiceResult<Project> {
        let mut project = self.require(id).await?;
        project.apply(edit, editor, &*self.clock);
        self.store.update_project(&project).await?;
        debug!(project_id = %id, "project updated");
        Ok(project)
    }

    /// Finds a project by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError::Repository`] when lookup fails.
    pub async fn find(&self, id: ProjectId) -> TrackerServiceResult<Option<Project>> {
        Ok(self.store.find_project(id).await?)
    }

    /// Returns every project in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError::Repository`] when lookup fails.
    pub async fn list(&self) -> TrackerServiceResult<Vec<Project>> {
        Ok(self.store.list_projects().await?)
    }

    /// Deletes a project with its sprints, statuses and tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError`] when the project does not exist or the
    /// repository rejects the delete.
    pub async fn delete(&self, id: ProjectId) -> TrackerServiceResult<()> {
        self.store.delete_project(id).await?;
        info!(project_id = %id, "project deleted");
        Ok(())
    }

    async fn require(&self, id: ProjectId) -> TrackerServiceResult<Project> {
        self.store
            .find_project(id)
            .await?
            .ok_or(TrackerServiceError::Repository(
                TrackerRepositoryError::ProjectNotFound(id),
            ))
    }
}
