//! Shared wiring for in-memory integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use zira::account::{
    adapters::memory::InMemoryUserDirectory,
    domain::{EmailAddress, User, Username},
    ports::UserDirectory,
};
use zira::tracker::{
    adapters::{memory::InMemoryTrackerStore, notify::RecordingNotifier},
    domain::{Project, Status, StatusOrder, Task},
    ports::StatusRepository,
    services::{
        CreateProjectRequest, CreateTaskRequest, NotificationSettings, ProjectService,
        StatusSequencer, TaskNotificationService, TaskService,
    },
};

/// Sequencer over the in-memory adapters.
pub type Sequencer =
    StatusSequencer<InMemoryTrackerStore, DefaultClock, InMemoryUserDirectory, RecordingNotifier>;

/// Task service over the in-memory adapters.
pub type Tasks =
    TaskService<InMemoryTrackerStore, DefaultClock, InMemoryUserDirectory, RecordingNotifier>;

/// Services sharing one in-memory store, directory and notifier.
pub struct Tracker {
    pub store: Arc<InMemoryTrackerStore>,
    pub users: Arc<InMemoryUserDirectory>,
    pub notifier: Arc<RecordingNotifier>,
    pub projects: ProjectService<InMemoryTrackerStore, DefaultClock>,
    pub tasks: Tasks,
    pub sequencer: Arc<Sequencer>,
}

impl Tracker {
    /// Creates a tracker whose projects start with `workflow`.
    pub fn with_workflow(workflow: &[&str]) -> Self {
        let store = Arc::new(InMemoryTrackerStore::new());
        let users = Arc::new(InMemoryUserDirectory::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let clock = Arc::new(DefaultClock);
        let notifications = TaskNotificationService::new(
            Arc::clone(&store),
            Arc::clone(&users),
            Arc::clone(&notifier),
            NotificationSettings::new(
                EmailAddress::new("noreply@zira.local").expect("valid sender"),
            ),
        );
        Self {
            projects: ProjectService::new(Arc::clone(&store), Arc::clone(&clock))
                .with_default_statuses(workflow.iter().copied())
                .expect("valid workflow"),
            tasks: TaskService::new(
                Arc::clone(&store),
                Arc::clone(&clock),
                notifications.clone(),
            ),
            sequencer: Arc::new(StatusSequencer::new(
                Arc::clone(&store),
                clock,
                notifications,
            )),
            store,
            users,
            notifier,
        }
    }

    /// Creates a project seeded with the tracker's workflow.
    pub async fn project(&self, name: &str) -> Project {
        self.projects
            .create(CreateProjectRequest::new(name))
            .await
            .expect("project created")
    }

    /// Creates a task at the project's first status.
    pub async fn task(&self, project: &Project, name: &str) -> Task {
        self.tasks
            .create(CreateTaskRequest::new(project.id(), name))
            .await
            .expect("task created")
    }

    /// Registers a user reachable at `<name>@example.com`.
    pub async fn user(&self, name: &str) -> User {
        let user = User::new(
            Username::new(name).expect("valid username"),
            Some(EmailAddress::new(format!("{name}@example.com")).expect("valid email")),
            &DefaultClock,
        );
        self.users.store(&user).await.expect("user stored");
        user
    }

    /// Loads the project's workflow.
    pub async fn order(&self, project: &Project) -> StatusOrder {
        self.store
            .status_order(project.id())
            .await
            .expect("status order loads")
    }

    /// Returns the status called `name` in the project's workflow.
    pub async fn status(&self, project: &Project, name: &str) -> Status {
        self.order(project)
            .await
            .statuses()
            .iter()
            .find(|status| status.name().as_str() == name)
            .cloned()
            .expect("status exists")
    }

    /// Returns the name of the task's current status.
    pub async fn status_name_of(&self, task: &Task) -> Option<String> {
        let current = self
            .tasks
            .find(task.id())
            .await
            .expect("task lookup")
            .expect("task exists")
            .status_id()?;
        self.store
            .find_status(current)
            .await
            .expect("status lookup")
            .map(|status| status.name().as_str().to_owned())
    }
}

/// Tracker whose projects use the four-step review workflow.
#[fixture]
pub fn tracker() -> Tracker {
    Tracker::with_workflow(&["Open", "In Progress", "Review", "Done"])
}
