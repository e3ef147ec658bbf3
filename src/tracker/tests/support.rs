//! Shared wiring for tracker service tests.

use std::sync::Arc;

use crate::account::{
    adapters::memory::InMemoryUserDirectory,
    domain::{EmailAddress, User, Username},
    ports::UserDirectory,
};
use crate::tracker::{
    adapters::{memory::InMemoryTrackerStore, notify::RecordingNotifier},
    domain::{Project, Status, StatusOrder},
    ports::StatusRepository,
    services::{
        CreateProjectRequest, NotificationSettings, ProjectService, SprintService,
        StatusCatalogService, StatusSequencer, TaskNotificationService, TaskService,
    },
};
use mockable::DefaultClock;

pub type TestTaskService =
    TaskService<InMemoryTrackerStore, DefaultClock, InMemoryUserDirectory, RecordingNotifier>;
pub type TestSequencer =
    StatusSequencer<InMemoryTrackerStore, DefaultClock, InMemoryUserDirectory, RecordingNotifier>;

/// Every tracker service over one in-memory store and directory.
pub struct Harness {
    pub store: Arc<InMemoryTrackerStore>,
    pub users: Arc<InMemoryUserDirectory>,
    pub notifier: Arc<RecordingNotifier>,
    pub projects: ProjectService<InMemoryTrackerStore, DefaultClock>,
    pub sprints: SprintService<InMemoryTrackerStore, DefaultClock>,
    pub statuses: StatusCatalogService<InMemoryTrackerStore, DefaultClock>,
    pub tasks: TestTaskService,
    pub sequencer: TestSequencer,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_notifier(RecordingNotifier::new())
    }

    pub fn with_notifier(notifier: RecordingNotifier) -> Self {
        let store = Arc::new(InMemoryTrackerStore::new());
        let users = Arc::new(InMemoryUserDirectory::new());
        let notifier = Arc::new(notifier);
        let clock = Arc::new(DefaultClock);
        let sender = EmailAddress::new("zira@example.com").expect("valid sender");
        let notifications = TaskNotificationService::new(
            Arc::clone(&store),
            Arc::clone(&users),
            Arc::clone(&notifier),
            NotificationSettings::new(sender),
        );
        Self {
            projects: ProjectService::new(Arc::clone(&store), Arc::clone(&clock)),
            sprints: SprintService::new(Arc::clone(&store), Arc::clone(&clock)),
            statuses: StatusCatalogService::new(Arc::clone(&store), Arc::clone(&clock)),
            tasks: TaskService::new(
                Arc::clone(&store),
                Arc::clone(&clock),
                notifications.clone(),
            ),
            sequencer: StatusSequencer::new(Arc::clone(&store), clock, notifications),
            store,
            users,
            notifier,
        }
    }

    /// Registers a user with an address derived from the username.
    pub async fn user(&self, name: &str) -> User {
        let email = EmailAddress::new(format!("{name}@example.com")).expect("valid email");
        let user = User::new(
            Username::new(name).expect("valid username"),
            Some(email),
            &DefaultClock,
        );
        self.users.store(&user).await.expect("user stored");
        user
    }

    /// Creates a project whose workflow holds exactly `names`, in order.
    pub async fn project_with_workflow(&self, names: &[&str]) -> (Project, StatusOrder) {
        let projects = ProjectService::new(Arc::clone(&self.store), Arc::new(DefaultClock))
            .with_default_statuses(names.iter().copied())
            .expect("valid status names");
        let project = projects
            .create(CreateProjectRequest::new("Zira"))
            .await
            .expect("project created");
        let order = self.order_of(&project).await;
        (project, order)
    }

    pub async fn order_of(&self, project: &Project) -> StatusOrder {
        self.store
            .status_order(project.id())
            .await
            .expect("status order loads")
    }
}

/// Returns the status called `name` in `order`.
pub fn status_named(order: &StatusOrder, name: &str) -> Status {
    order
        .statuses()
        .iter()
        .find(|status| status.name().as_str() == name)
        .cloned()
        .expect("status exists")
}
