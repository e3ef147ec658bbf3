//! Domain model for project and task tracking.
//!
//! Everything in here is free of infrastructure: repositories and notifiers
//! are reached through [`crate::tracker::ports`].

mod completion;
mod error;
mod filter;
mod ids;
mod name;
mod notice;
mod project;
mod schedule;
mod sprint;
mod status;
mod task;
mod workflow;

pub use completion::Completion;
pub use error::{EntityKind, ParseSwapDirectionError, TrackerDomainError, WorkflowError};
pub use filter::TaskFilter;
pub use ids::{ProjectId, SprintId, StatusId, TaskId};
pub use name::ItemName;
pub use notice::{TaskNotice, TaskNoticeKind};
pub use project::{PersistedProjectData, Project};
pub use schedule::ScheduleEdit;
pub use sprint::{PersistedSprintData, Sprint};
pub use status::{DEFAULT_STATUS_NAMES, PersistedStatusData, Status, StatusRank};
pub use task::{NewTask, PersistedTaskData, Task, TaskEdit, TaskRevision};
pub use workflow::{StatusOrder, StatusSwap, Step, SwapDirection, TaskStep};
