//! Task list filter.

use super::{ProjectId, SprintId, Task};
use crate::account::domain::UserId;

/// Criteria for listing tasks. An empty filter matches every task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    project_id: Option<ProjectId>,
    sprint_id: Option<SprintId>,
    worker: Option<UserId>,
    name_contains: Option<String>,
    completed: Option<bool>,
}

impl TaskFilter {
    /// Creates a filter matching every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the list to one project.
    #[must_use]
    pub const fn in_project(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Restricts the list to one sprint.
    #[must_use]
    pub const fn in_sprint(mut self, sprint_id: SprintId) -> Self {
        self.sprint_id = Some(sprint_id);
        self
    }

    /// Restricts the list to tasks assigned to `worker`.
    #[must_use]
    pub const fn assigned_to(mut self, worker: UserId) -> Self {
        self.worker = Some(worker);
        self
    }

    /// Restricts the list to names containing `fragment`, ignoring case.
    ///
    /// A blank fragment leaves the filter unrestricted.
    #[must_use]
    pub fn name_contains(mut self, fragment: impl Into<String>) -> Self {
        let raw = fragment.into();
        let trimmed = raw.trim();
        self.name_contains = (!trimmed.is_empty()).then(|| trimmed.to_lowercase());
        self
    }

    /// Restricts the list by completion flag.
    #[must_use]
    pub const fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Returns the project restriction.
    #[must_use]
    pub const fn project_id(&self) -> Option<ProjectId> {
        self.project_id
    }

    /// Returns the sprint restriction.
    #[must_use]
    pub const fn sprint_id(&self) -> Option<SprintId> {
        self.sprint_id
    }

    /// Returns the worker restriction.
    #[must_use]
    pub const fn worker(&self) -> Option<UserId> {
        self.worker
    }

    /// Returns the lowercased name fragment.
    #[must_use]
    pub fn name_fragment(&self) -> Option<&str> {
        self.name_contains.as_deref()
    }

    /// Returns the completion restriction.
    #[must_use]
    pub const fn completion(&self) -> Option<bool> {
        self.completed
    }

    /// Returns `true` when `task` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.project_id.is_none_or(|id| task.project_id() == id)
            && self.sprint_id.is_none_or(|id| task.sprint_id() == Some(id))
            && self.worker.is_none_or(|id| task.worker() == Some(id))
            && self
                .completed
                .is_none_or(|flag| task.completion().is_completed() == flag)
            && self.name_contains.as_deref().is_none_or(|fragment| {
                task.name().as_str().to_lowercase().contains(fragment)
            })
    }
}
