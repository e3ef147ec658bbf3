//! Port contracts for project and task tracking.
//!
//! Ports define infrastructure-agnostic interfaces used by tracker services.
//! A single backing store usually implements every repository port, which
//! [`TrackerStore`] captures as one bound.

pub mod notifier;
pub mod project;
pub mod repository;
pub mod sprint;
pub mod status;
pub mod task;
pub mod workflow;

pub use notifier::{Notifier, NotifierError, OutgoingMessage};
pub use project::ProjectRepository;
pub use repository::{TrackerRepositoryError, TrackerRepositoryResult};
pub use sprint::SprintRepository;
pub use status::StatusRepository;
pub use task::TaskRepository;
pub use workflow::WorkflowRepository;

/// Every repository port the tracker services need from one store.
pub trait TrackerStore:
    ProjectRepository + SprintRepository + StatusRepository + TaskRepository + WorkflowRepository
{
}

impl<T> TrackerStore for T where
    T: ProjectRepository + SprintRepository + StatusRepository + TaskRepository + WorkflowRepository
{
}
