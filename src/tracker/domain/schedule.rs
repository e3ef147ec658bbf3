//! Edits shared by the scheduled containers: projects and sprints.

use super::ItemName;
use chrono::{DateTime, Utc};

/// Partial update of a project or sprint.
///
/// Fields left unset keep their current values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleEdit {
    pub(crate) name: Option<ItemName>,
    pub(crate) description: Option<Option<String>>,
    pub(crate) finish_by: Option<Option<DateTime<Utc>>>,
    pub(crate) completed: Option<bool>,
}

impl ScheduleEdit {
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

    /// Replaces the deadline.
    #[must_use]
    pub const fn with_finish_by(mut self, finish_by: Option<DateTime<Utc>>) -> Self {
        self.finish_by = Some(finish_by);
        self
    }

    /// Sets the completion flag.
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Returns `true` when the edit changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.finish_by.is_none()
            && self.completed.is_none()
    }
}

/// Trims a free-text description, mapping blank text to `None`.
pub(crate) fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}
