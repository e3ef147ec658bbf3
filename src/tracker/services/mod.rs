//! Application services for project and task tracking.

mod error;
mod notification;
mod project;
mod sequencer;
mod sprint;
mod status_catalog;
mod task;

pub use error::{TrackerServiceError, TrackerServiceResult};
pub use notification::{
    NotificationError, NotificationSettings, NotificationTemplates, TaskNotificationService,
};
pub use project::{CreateProjectRequest, ProjectService};
pub use sequencer::{SequencerError, SequencerResult, StatusSequencer};
pub use sprint::{CreateSprintRequest, SprintService};
pub use status_catalog::StatusCatalogService;
pub use task::{CreateTaskRequest, TaskService};
