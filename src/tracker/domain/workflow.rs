//! Ordered status workflow of a project.
//!
//! [`StatusOrder`] is a snapshot of one project's statuses sorted by rank.
//! Adapters build it inside their atomic scope (a write lock or a database
//! transaction), ask it where a task or status moves, and write the result
//! before releasing the scope. The order itself never touches storage.

use super::{
    ParseSwapDirectionError, ProjectId, Status, StatusId, StatusRank, Task, TrackerDomainError,
    WorkflowError,
};

/// One-position move through the ordered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Towards the end of the workflow.
    Forward,
    /// Towards the start of the workflow.
    Backward,
}

impl Step {
    /// Returns the position one step away from `position`, if representable.
    const fn apply(self, position: usize) -> Option<usize> {
        match self {
            Self::Forward => position.checked_add(1),
            Self::Backward => position.checked_sub(1),
        }
    }
}

/// Direction in which a status trades places with its neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapDirection {
    /// Trade places with the previous status.
    Up,
    /// Trade places with the next status.
    Down,
}

impl SwapDirection {
    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }

    /// Returns the list step this direction corresponds to.
    #[must_use]
    pub const fn step(self) -> Step {
        match self {
            Self::Up => Step::Backward,
            Self::Down => Step::Forward,
        }
    }
}

impl TryFrom<&str> for SwapDirection {
    type Error = ParseSwapDirectionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            _ => Err(ParseSwapDirectionError(value.to_owned())),
        }
    }
}

/// Result of advancing or retreating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStep {
    /// The task moved to an adjacent status.
    Moved {
        /// Task as persisted before the move.
        before: Box<Task>,
        /// Task as persisted after the move.
        after: Box<Task>,
    },
    /// The task already sat at the boundary in the requested direction.
    Unchanged(Box<Task>),
}

impl TaskStep {
    /// Returns the task in its current persisted form.
    #[must_use]
    pub fn task(&self) -> &Task {
        match self {
            Self::Moved { after, .. } => after,
            Self::Unchanged(task) => task,
        }
    }

    /// Consumes the outcome and returns the current task.
    #[must_use]
    pub fn into_task(self) -> Task {
        match self {
            Self::Moved { after, .. } => *after,
            Self::Unchanged(task) => *task,
        }
    }

    /// Returns `true` when the task moved.
    #[must_use]
    pub const fn is_moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// Result of swapping a status with its neighbour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSwap {
    /// The two statuses exchanged ranks.
    Swapped {
        /// The status that was asked to move, with its new rank.
        moved: Status,
        /// The neighbour it traded places with, with its new rank.
        displaced: Status,
    },
    /// The status already sat at the boundary in the requested direction.
    Unchanged(Status),
}

impl StatusSwap {
    /// Returns `true` when ranks were exchanged.
    #[must_use]
    pub const fn is_swapped(&self) -> bool {
        matches!(self, Self::Swapped { .. })
    }
}

/// Statuses of one project in workflow order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusOrder {
    project_id: ProjectId,
    statuses: Vec<Status>,
}

impl StatusOrder {
    /// Builds the order from a project's statuses in any order.
    ///
    /// Statuses are sorted by rank; ties, which storage forbids, fall back to
    /// creation time and then identifier so the order stays total.
    #[must_use]
    pub fn new(project_id: ProjectId, mut statuses: Vec<Status>) -> Self {
        statuses.sort_by(|left, right| {
            left.rank()
                .cmp(&right.rank())
                .then_with(|| left.created_at().cmp(&right.created_at()))
                .then_with(|| left.id().into_inner().cmp(&right.id().into_inner()))
        });
        Self {
            project_id,
            statuses,
        }
    }

    /// Returns the project the order belongs to.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the statuses in workflow order.
    #[must_use]
    pub fn statuses(&self) -> &[Status] {
        &self.statuses
    }

    /// Consumes the order and returns the statuses in workflow order.
    #[must_use]
    pub fn into_statuses(self) -> Vec<Status> {
        self.statuses
    }

    /// Returns the status names in workflow order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.statuses.iter().map(|status| status.name().as_str()).collect()
    }

    /// Returns the number of statuses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    /// Returns `true` when the project has no statuses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// Returns the first status of the workflow, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Status> {
        self.statuses.first()
    }

    /// Returns the member status with `status_id`, if any.
    #[must_use]
    pub fn get(&self, status_id: StatusId) -> Option<&Status> {
        self.statuses.iter().find(|status| status.id() == status_id)
    }

    /// Returns the zero-based position of `status_id`, if it is a member.
    #[must_use]
    pub fn position_of(&self, status_id: StatusId) -> Option<usize> {
        self.statuses
            .iter()
            .position(|status| status.id() == status_id)
    }

    /// Returns the rank a newly appended status receives.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerDomainError::RankOutOfRange`] when the last rank has
    /// no storable successor.
    pub fn next_rank(&self) -> Result<StatusRank, TrackerDomainError> {
        self.statuses
            .iter()
            .map(Status::rank)
            .max()
            .map_or(Ok(StatusRank::FIRST), StatusRank::successor)
    }

    /// Returns the status one `step` away from `status_id`.
    ///
    /// `Ok(None)` means `status_id` already sits at the boundary in that
    /// direction.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::StatusOutsideWorkflow`] when `status_id` is
    /// not a member of this order.
    pub fn neighbour(
        &self,
        status_id: StatusId,
        step: Step,
    ) -> Result<Option<&Status>, WorkflowError> {
        let position = self
            .position_of(status_id)
            .ok_or(WorkflowError::StatusOutsideWorkflow {
                status_id,
                project_id: self.project_id,
            })?;
        Ok(step
            .apply(position)
            .and_then(|target| self.statuses.get(target)))
    }

    /// Returns the status `task` moves to when stepped, or `None` at the
    /// boundary.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::TaskWithoutStatus`] when the task has no
    /// status, or [`WorkflowError::StatusOutsideWorkflow`] when its status is
    /// not a member of this order.
    pub fn step_target(
        &self,
        task: &Task,
        step: Step,
    ) -> Result<Option<StatusId>, WorkflowError> {
        let current = task
            .status_id()
            .ok_or(WorkflowError::TaskWithoutStatus(task.id()))?;
        Ok(self.neighbour(current, step)?.map(Status::id))
    }

    /// Returns the neighbour `status_id` trades ranks with, or `None` at the
    /// boundary.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::StatusOutsideWorkflow`] when `status_id` is
    /// not a member of this order.
    pub fn swap_partner(
        &self,
        status_id: StatusId,
        direction: SwapDirection,
    ) -> Result<Option<StatusId>, WorkflowError> {
        Ok(self.neighbour(status_id, direction.step())?.map(Status::id))
    }
}
