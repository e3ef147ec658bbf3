//! Notification decision derived from a task change.

use super::{StatusId, Task, TaskId};
use crate::account::domain::UserId;

/// What changed on a task, from the worker's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskNoticeKind {
    /// The task was assigned to a (new) worker.
    WorkerAssigned,
    /// The task moved to another status.
    StatusChanged {
        /// Status before the change.
        from: Option<StatusId>,
        /// Status after the change.
        to: Option<StatusId>,
    },
}

/// A notification owed to a task's worker after a change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskNotice {
    task_id: TaskId,
    task_name: String,
    recipient: Option<UserId>,
    editor: Option<UserId>,
    kind: TaskNoticeKind,
}

impl TaskNotice {
    /// Decides which notification, if any, a change from `before` to
    /// `after` calls for.
    ///
    /// A worker change wins over a status change, so at most one notice is
    /// produced. The recipient is the worker on `after`; it may be `None`
    /// when the task was unassigned, in which case there is nobody to tell.
    #[must_use]
    pub fn from_change(before: &Task, after: &Task) -> Option<Self> {
        let kind = if before.worker() != after.worker() {
            TaskNoticeKind::WorkerAssigned
        } else if before.status_id() != after.status_id() {
            TaskNoticeKind::StatusChanged {
                from: before.status_id(),
                to: after.status_id(),
            }
        } else {
            return None;
        };

        Some(Self {
            task_id: after.id(),
            task_name: after.name().as_str().to_owned(),
            recipient: after.worker(),
            editor: after.last_editor(),
            kind,
        })
    }

    /// Returns the task the notice is about.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the task name at the time of the change.
    #[must_use]
    pub fn task_name(&self) -> &str {
        &self.task_name
    }

    /// Returns the worker to notify, if the task has one.
    #[must_use]
    pub const fn recipient(&self) -> Option<UserId> {
        self.recipient
    }

    /// Returns the user who made the change, if known.
    #[must_use]
    pub const fn editor(&self) -> Option<UserId> {
        self.editor
    }

    /// Returns what changed.
    #[must_use]
    pub const fn kind(&self) -> TaskNoticeKind {
        self.kind
    }
}
