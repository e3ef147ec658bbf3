//! Task lifecycle with cross-project checks and change notifications.

use super::{TaskNotificationService, TrackerServiceError, TrackerServiceResult};
use crate::account::{domain::UserId, ports::UserDirectory};
use crate::tracker::{
    domain::{
        EntityKind, ItemName, NewTask, ProjectId, SprintId, Status, StatusId, Task, TaskEdit,
        TaskFilter, TaskId, TaskNotice, TaskRevision, TrackerDomainError,
    },
    ports::{
        Notifier, ProjectRepository, SprintRepository, StatusRepository, TaskRepository,
        TrackerRepositoryError,
    },
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    project_id: ProjectId,
    name: String,
    description: Option<String>,
    author: Option<UserId>,
    worker: Option<UserId>,
    sprint_id: Option<SprintId>,
    status_id: Option<StatusId>,
    finish_by: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    /// Creates a request for a task in `project_id`.
    #[must_use]
    pub fn new(project_id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            project_id,
            name: name.into(),
            description: None,
            author: None,
            worker: None,
            sprint_id: None,
            status_id: None,
            finish_by: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the creating user.
    #[must_use]
    pub const fn with_author(mut self, author: UserId) -> Self {
        self.author = Some(author);
        self
    }

    /// Assigns a worker.
    #[must_use]
    pub const fn with_worker(mut self, worker: UserId) -> Self {
        self.worker = Some(worker);
        self
    }

    /// Plans the task into a sprint of the same project.
    #[must_use]
    pub const fn with_sprint(mut self, sprint_id: SprintId) -> Self {
        self.sprint_id = Some(sprint_id);
        self
    }

    /// Sets the initial status. Without one the project's first status is
    /// used.
    #[must_use]
    pub const fn with_status(mut self, status_id: StatusId) -> Self {
        self.status_id = Some(status_id);
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub const fn with_finish_by(mut self, finish_by: DateTime<Utc>) -> Self {
        self.finish_by = Some(finish_by);
        self
    }
}

/// Task lifecycle service.
pub struct TaskService<S, C, D, N>
where
    S: ProjectRepository + SprintRepository + StatusRepository + TaskRepository,
    C: Clock + Send + Sync,
    D: UserDirectory,
    N: Notifier,
{
    store: Arc<S>,
    clock: Arc<C>,
    notifications: TaskNotificationService<S, D, N>,
}

impl<S, C, D, N> TaskService<S, C, D, N>
where
    S: ProjectRepository + SprintRepository + StatusRepository + TaskRepository,
    C: Clock + Send + Sync,
    D: UserDirectory,
    N: Notifier,
{
    /// Creates a new task service.
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

    /// Creates a task inside an existing project.
    ///
    /// A sprint or status given in the request must belong to the same
    /// project. Without a status the task starts at the project's first
    /// status, or without one when the workflow is empty. Creation never
    /// sends a notification.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError`] when the name is invalid, a reference
    /// does not exist or belongs to another project, or the repository
    /// rejects persistence.
    pub async fn create(&self, request: CreateTaskRequest) -> TrackerServiceResult<Task> {
        let name = ItemName::new(EntityKind::Task, request.name)?;
        let project_id = request.project_id;
        if self.store.find_project(project_id).await?.is_none() {
            return Err(TrackerRepositoryError::ProjectNotFound(project_id).into());
        }
        if let Some(sprint_id) = request.sprint_id {
            self.check_sprint(project_id, sprint_id).await?;
        }
        let status_id = match request.status_id {
            Some(status_id) => {
                self.check_status(project_id, status_id).await?;
                Some(status_id)
            }
            None => self
                .store
                .status_order(project_id)
                .await?
                .first()
                .map(Status::id),
        };

        let task = Task::new(
            NewTask {
                project_id,
                name,
                description: request.description,
                author: request.author,
                worker: request.worker,
                sprint_id: request.sprint_id,
                status_id,
                finish_by: request.finish_by,
            },
            &*self.clock,
        );
        self.store.store_task(&task).await?;
        info!(task_id = %task.id(), project_id = %project_id, "task created");
        Ok(task)
    }

    /// Applies `edit` to a task on behalf of `editor`.
    ///
    /// The edit is applied to the task as currently stored, so a concurrent
    /// workflow move is kept. When the worker or status changes, the
    /// affected worker is notified after the change is stored. Notification
    /// failures are logged and do not affect the result.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError`] when the task does not exist, a new
    /// sprint or status does not exist or belongs to another project, or the
    /// repository rejects persistence.
    pub async fn update(
        &self,
        id: TaskId,
        edit: TaskEdit,
        editor: Option<UserId>,
    ) -> TrackerServiceResult<Task> {
        // A task never changes project, so these checks hold for the edit
        // applied below.
        let project_id = self
            .store
            .find_task(id)
            .await?
            .ok_or(TrackerServiceError::Repository(
                TrackerRepositoryError::TaskNotFound(id),
            ))?
            .project_id();
        if let Some(Some(sprint_id)) = edit.sprint_id() {
            self.check_sprint(project_id, sprint_id).await?;
        }
        if let Some(Some(status_id)) = edit.status_id() {
            self.check_status(project_id, status_id).await?;
        }

        let TaskRevision { before, after } = self
            .store
            .apply_task_edit(id, edit, editor, self.clock.utc())
            .await?;
        let notice = TaskNotice::from_change(&before, &after);
        debug!(task_id = %id, notify = notice.is_some(), "task updated");

        if let Some(pending) = notice {
            self.notifications.dispatch(&pending).await;
        }
        Ok(after)
    }

    /// Finds a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError::Repository`] when lookup fails.
    pub async fn find(&self, id: TaskId) -> TrackerServiceResult<Option<Task>> {
        Ok(self.store.find_task(id).await?)
    }

    /// Returns tasks matching `filter` in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError::Repository`] when lookup fails.
    pub async fn list(&self, filter: &TaskFilter) -> TrackerServiceResult<Vec<Task>> {
        Ok(self.store.list_tasks(filter).await?)
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError`] when the task does not exist or the
    /// repository rejects the delete.
    pub async fn delete(&self, id: TaskId) -> TrackerServiceResult<()> {
        self.store.delete_task(id).await?;
        info!(task_id = %id, "task deleted");
        Ok(())
    }

    async fn check_sprint(
        &self,
        project_id: ProjectId,
        sprint_id: SprintId,
    ) -> TrackerServiceResult<()> {
        let sprint = self
            .store
            .find_sprint(sprint_id)
            .await?
            .ok_or(TrackerServiceError::Repository(
                TrackerRepositoryError::SprintNotFound(sprint_id),
            ))?;
        same_project(
            EntityKind::Sprint,
            sprint_id.into_inner(),
            project_id,
            sprint.project_id(),
        )
    }

    async fn check_status(
        &self,
        project_id: ProjectId,
        status_id: StatusId,
    ) -> TrackerServiceResult<()> {
        let status = self
            .store
            .find_status(status_id)
            .await?
            .ok_or(TrackerServiceError::Repository(
                TrackerRepositoryError::StatusNotFound(status_id),
            ))?;
        same_project(
            EntityKind::Status,
            status_id.into_inner(),
            project_id,
            status.project_id(),
        )
    }
}

fn same_project(
    kind: EntityKind,
    reference: uuid::Uuid,
    expected: ProjectId,
    actual: ProjectId,
) -> TrackerServiceResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(TrackerDomainError::CrossProjectReference {
            kind,
            reference,
            expected,
            actual,
        }
        .into())
    }
}
