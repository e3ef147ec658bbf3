//! Completion flag with its first-completion timestamp.

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Completion state of a project, sprint or task.
///
/// An item is complete exactly when a completion timestamp is recorded.
/// Re-marking a complete item keeps the original timestamp; marking it
/// incomplete clears the timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    completed_at: Option<DateTime<Utc>>,
}

impl Completion {
    /// Returns an incomplete state.
    #[must_use]
    pub const fn pending() -> Self {
        Self { completed_at: None }
    }

    /// Restores a completion state from a persisted timestamp.
    #[must_use]
    pub const fn from_timestamp(completed_at: Option<DateTime<Utc>>) -> Self {
        Self { completed_at }
    }

    /// Returns `true` when the item is complete.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Returns the first-completion timestamp, if complete.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Sets the completion flag, recording the time of first completion.
    pub fn mark(&mut self, completed: bool, clock: &impl Clock) {
        self.mark_at(completed, clock.utc());
    }

    /// Sets the completion flag, recording `at` as the time of first
    /// completion.
    pub const fn mark_at(&mut self, completed: bool, at: DateTime<Utc>) {
        if !completed {
            self.completed_at = None;
        } else if self.completed_at.is_none() {
            self.completed_at = Some(at);
        }
    }
}
