//! Workflow status entity and its per-project rank.

use super::{ItemName, ProjectId, StatusId, TrackerDomainError};
use crate::account::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status names seeded into every new project, in workflow order.
pub const DEFAULT_STATUS_NAMES: [&str; 5] = ["Open", "In Progress", "In Review", "Done", "Deleted"];

/// Position of a status within its project's workflow.
///
/// Ranks are unique per project. Lower ranks come first; gaps left by
/// deleted statuses are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusRank(u32);

impl StatusRank {
    /// Largest rank representable in the `PostgreSQL` schema (`INTEGER`).
    const MAX_PERSISTED_VALUE: u32 = i32::MAX.unsigned_abs();

    /// Rank of the first status in an empty workflow.
    pub const FIRST: Self = Self(0);

    /// Creates a validated rank.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerDomainError::RankOutOfRange`] above `i32::MAX`.
    pub const fn new(value: u32) -> Result<Self, TrackerDomainError> {
        if value > Self::MAX_PERSISTED_VALUE {
            return Err(TrackerDomainError::RankOutOfRange(value as u64));
        }
        Ok(Self(value))
    }

    /// Returns the rank immediately after this one.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerDomainError::RankOutOfRange`] when the successor is
    /// not storable.
    pub const fn successor(self) -> Result<Self, TrackerDomainError> {
        match self.0.checked_add(1) {
            Some(next) => Self::new(next),
            None => Err(TrackerDomainError::RankOutOfRange(u32::MAX as u64 + 1)),
        }
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for StatusRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named workflow stage a task can occupy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    id: StatusId,
    project_id: ProjectId,
    name: ItemName,
    rank: StatusRank,
    author: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedStatusData {
    /// Persisted status identifier.
    pub id: StatusId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Persisted name.
    pub name: ItemName,
    /// Persisted rank.
    pub rank: StatusRank,
    /// Persisted author.
    pub author: Option<UserId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Status {
    /// Creates a status at `rank` in `project_id`.
    #[must_use]
    pub fn new(
        project_id: ProjectId,
        name: ItemName,
        rank: StatusRank,
        author: Option<UserId>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: StatusId::new(),
            project_id,
            name,
            rank,
            author,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a status from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedStatusData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            name: data.name,
            rank: data.rank,
            author: data.author,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the status identifier.
    #[must_use]
    pub const fn id(&self) -> StatusId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(&self) -> &ItemName {
        &self.name
    }

    /// Returns the workflow rank.
    #[must_use]
    pub const fn rank(&self) -> StatusRank {
        self.rank
    }

    /// Returns the author, if known.
    #[must_use]
    pub const fn author(&self) -> Option<UserId> {
        self.author
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

    /// Renames the status.
    pub fn rename(&mut self, name: ItemName, clock: &impl Clock) {
        self.name = name;
        self.updated_at = clock.utc();
    }

    /// Copies the name and update timestamp of `renamed`, keeping this rank.
    pub(crate) fn take_name_from(&mut self, renamed: &Self) {
        self.name = renamed.name.clone();
        self.updated_at = renamed.updated_at;
    }

    /// Places the status at `rank` before it is first stored.
    pub(crate) const fn place_at(&mut self, rank: StatusRank) {
        self.rank = rank;
    }

    /// Exchanges workflow positions with `other`.
    pub(crate) fn swap_rank_with(&mut self, other: &mut Self, at: DateTime<Utc>) {
        std::mem::swap(&mut self.rank, &mut other.rank);
        self.updated_at = at;
        other.updated_at = at;
    }
}
