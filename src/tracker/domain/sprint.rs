//! Sprint entity: a time-boxed group of tasks within a project.

use super::{
    Completion, ItemName, ProjectId, ScheduleEdit, SprintId, schedule::normalize_description,
};
use crate::account::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A sprint belonging to one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprint {
    id: SprintId,
    project_id: ProjectId,
    name: ItemName,
    description: Option<String>,
    author: Option<UserId>,
    last_editor: Option<UserId>,
    finish_by: Option<DateTime<Utc>>,
    completion: Completion,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted sprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSprintData {
    /// Persisted sprint identifier.
    pub id: SprintId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Persisted name.
    pub name: ItemName,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted author.
    pub author: Option<UserId>,
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

impl Sprint {
    /// Creates a new, incomplete sprint in `project_id`.
    #[must_use]
    pub fn new(
        project_id: ProjectId,
        name: ItemName,
        description: Option<String>,
        finish_by: Option<DateTime<Utc>>,
        author: Option<UserId>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: SprintId::new(),
            project_id,
            name,
            description: normalize_description(description),
            author,
            last_editor: None,
            finish_by,
            completion: Completion::pending(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a sprint from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedSprintData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            name: data.name,
            description: data.description,
            author: data.author,
            last_editor: data.last_editor,
            finish_by: data.finish_by,
            completion: data.completion,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the sprint identifier.
    #[must_use]
    pub const fn id(&self) -> SprintId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the sprint name.
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

    /// Returns the user who last edited the sprint, if any.
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
    pub fn apply(&mut self, edit: ScheduleEdit, editor: Option<UserId>, clock: &impl Clock) {
        let ScheduleEdit {
            name,
            description,
            finish_by,
            completed,
        } = edit;
        if let Some(new_name) = name {
            self.name = new_name;
        }
        if let Some(new_description) = description {
            self.description = new_description;
        }
        if let Some(new_finish_by) = finish_by {
            self.finish_by = new_finish_by;
        }
        if let Some(is_completed) = completed {
            self.completion.mark(is_completed, clock);
        }
        self.last_editor = editor;
        self.updated_at = clock.utc();
    }
}
