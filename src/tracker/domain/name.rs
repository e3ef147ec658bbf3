//! Validated display names for tracked entities.

use super::{EntityKind, TrackerDomainError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trimmed, non-empty name shared by projects, sprints, statuses and tasks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemName(String);

impl ItemName {
    /// Maximum name length in characters.
    pub const MAX_LENGTH: usize = 200;

    /// Creates a validated name for the given entity kind.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerDomainError::EmptyName`] for blank input or
    /// [`TrackerDomainError::NameTooLong`] when the trimmed value exceeds
    /// [`Self::MAX_LENGTH`] characters.
    pub fn new(kind: EntityKind, value: impl Into<String>) -> Result<Self, TrackerDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TrackerDomainError::EmptyName(kind));
        }
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(TrackerDomainError::NameTooLong {
                kind,
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ItemName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ItemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
