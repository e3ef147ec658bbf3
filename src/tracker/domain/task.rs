//! Task aggregate root.

use super::{
    Completion, ItemName, ProjectId, SprintId, StatusId, TaskId, schedule::normalize_description,
};
use crate::account::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A unit of work inside a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    sprint_id: Option<SprintId>,
    status_id: Option<StatusId>,
    name: ItemName,
    description: Option<String>,
    author: Option<UserId>,
    worker: Option<UserId>,
    last_editor: Option<UserId>,
    finish_by: Option<DateTime<Utc>>,
    completion: Completion,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Validated input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Owning project.
    pub project_id: ProjectId,
    /// Task name.
    pub name: ItemName,
    /// Optional description.
    pub description: Option<String>,
    /// Creating user.
    pub author: Option<UserId>,
    /// Assigned worker.
    pub worker: Option<UserId>,
    /// Sprint the task is planned into.
    pub sprint_id: Option<SprintId>,
    /// Initial workflow status.
    pub status_id: Option<StatusId>,
    /// Deadline.
    pub finish_by: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Persisted sprint link.
    pub sprint_id: Option<SprintId>,
    /// Persisted status link.
    pub status_id: Option<StatusId>,
    /// Persisted name.
    pub name: ItemName,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted author.
    pub author: Option<UserId>,
    /// Persisted worker.
    pub worker: Option<UserId>,
    /// Persisted last editor.
    pub last_editor: Option<UserId>,
    /// Persisted deadline.
    pub finish_by: Option<DateTime<Utc>>,
    /// Persisted completion state.
    pub completion: Completion,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Partial update of a task. Fields left unset keep their current values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    name: Option<ItemName>,
    description: Option<Option<String>>,
    completed: Option<bool>,
    status_id: Option<Option<StatusId>>,
    worker: Option<Option<UserId>>,
    sprint_id: Option<Option<SprintId>>,
    finish_by: Option<Option<DateTime<Utc>>>,
}

impl TaskEdit {
    /// Creates an empty edit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the name.
    #[must_use]
    pub fn with_name(mut self, name: ItemName) -> Self {
        self.name = Some(name);
        self
    }

    /// Replaces the description; blank text clears it.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(normalize_description(description));
        self
    }

    /// Sets the completion flag.
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Replaces the current status.
    #[must_use]
    pub const fn with_status(mut self, status_id: Option<StatusId>) -> Self {
        self.status_id = Some(status_id);
        self
    }

    /// Replaces the assigned worker.
    #[must_use]
    pub const fn with_worker(mut self, worker: Option<UserId>) -> Self {
        self.worker = Some(worker);
        self
    }

    /// Replaces the sprint.
    #[must_use]
    pub const fn with_sprint(mut self, sprint_id: Option<SprintId>) -> Self {
        self.sprint_id = Some(sprint_id);
        self
    }

    /// Replaces the deadline.
    #[must_use]
    pub const fn with_finish_by(mut self, finish_by: Option<DateTime<Utc>>) -> Self {
        self.finish_by = Some(finish_by);
        self
    }

    /// Returns the status the edit assigns, if it touches the status.
    #[must_use]
    pub const fn status_id(&self) -> Option<Option<StatusId>> {
        self.status_id
    }

    /// Returns the sprint the edit assigns, if it touches the sprint.
    #[must_use]
    pub const fn sprint_id(&self) -> Option<Option<SprintId>> {
        self.sprint_id
    }
}

impl Task {
    /// Creates a new, incomplete task.
    #[must_use]
    pub fn new(data: NewTask, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            project_id: data.project_id,
            sprint_id: data.sprint_id,
            status_id: data.status_id,
            name: data.name,
            description: normalize_description(data.description),
            author: data.author,
            worker: data.worker,
            last_editor: None,
            finish_by: data.finish_by,
            completion: Completion::pending(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            sprint_id: data.sprint_id,
            status_id: data.status_id,
            name: data.name,
            description: data.description,
            author: data.author,
            worker: data.worker,
            last_editor: data.last_editor,
            finish_by: data.finish_by,
            completion: data.completion,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the sprint, if planned into one.
    #[must_use]
    pub const fn sprint_id(&self) -> Option<SprintId> {
        self.sprint_id
    }

    /// Returns the current status, if any.
    #[must_use]
    pub const fn status_id(&self) -> Option<StatusId> {
        self.status_id
    }

    /// Returns the task name.
    #[must_use]
    pub const fn name(&self) -> &ItemName {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the author, if known.
    #[must_use]
    pub const fn author(&self) -> Option<UserId> {
        self.author
    }

    /// Returns the assigned worker, if any.
    #[must_use]
    pub const fn worker(&self) -> Option<UserId> {
        self.worker
    }

    /// Returns the user who last edited the task, if any.
    #[must_use]
    pub const fn last_editor(&self) -> Option<UserId> {
        self.last_editor
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn finish_by(&self) -> Option<DateTime<Utc>> {
        self.finish_by
    }

    /// Returns the completion state.
    #[must_use]
    pub const fn completion(&self) -> Completion {
        self.completion
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies an edit on behalf of `editor`.
    pub fn apply(&mut self, edit: TaskEdit, editor: Option<UserId>, clock: &impl Clock) {
        self.apply_at(edit, editor, clock.utc());
    }

    /// Applies an edit on behalf of `editor` as of `at`.
    pub(crate) fn apply_at(
        &mut self,
        edit: TaskEdit,
        editor: Option<UserId>,
        at: DateTime<Utc>,
    ) {
        let TaskEdit {
            name,
            description,
            completed,
            status_id,
            worker,
            sprint_id,
            finish_by,
        } = edit;
        if let Some(new_name) = name {
            self.name = new_name;
        }
        if let Some(new_description) = description {
            self.description = new_description;
        }
        if let Some(is_completed) = completed {
            self.completion.mark_at(is_completed, at);
        }
        if let Some(new_status) = status_id {
            self.status_id = new_status;
        }
        if let Some(new_worker) = worker {
            self.worker = new_worker;
        }
        if let Some(new_sprint) = sprint_id {
            self.sprint_id = new_sprint;
        }
        if let Some(new_finish_by) = finish_by {
            self.finish_by = new_finish_by;
        }
        self.last_editor = editor;
        self.updated_at = at;
    }

    /// Moves the task to `status_id` as one workflow step.
    pub(crate) const fn move_to_status(
        &mut self,
        status_id: StatusId,
        editor: Option<UserId>,
        at: DateTime<Utc>,
    ) {
        self.status_id = Some(status_id);
        self.last_editor = editor;
        self.updated_at = at;
    }

    /// Clears the status link after its status was deleted.
    pub(crate) const fn detach_status(&mut self) {
        self.status_id = None;
    }

    /// Clears the sprint link after its sprint was deleted.
    pub(crate) const fn detach_sprint(&mut self) {
        self.sprint_id = None;
    }
}

/// A task as stored immediately before and after one edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRevision {
    /// Task as persisted before the edit.
    pub before: Task,
    /// Task as persisted after the edit.
    pub after: Task,
}
