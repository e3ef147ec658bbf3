//! Shared world state for status workflow BDD scenarios.

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
    domain::{Project, Status, StatusSwap, Task, TaskStep},
    ports::StatusRepository,
    services::{
        NotificationSettings, StatusSequencer, TaskNotificationService, TaskService,
    },
};

/// Sequencer type used by the BDD world.
pub type TestSequencer =
    StatusSequencer<InMemoryTrackerStore, DefaultClock, InMemoryUserDirectory, RecordingNotifier>;

/// Task service type used by the BDD world.
pub type TestTaskService =
    TaskService<InMemoryTrackerStore, DefaultClock, InMemoryUserDirectory, RecordingNotifier>;

/// Scenario world for status workflow behaviour tests.
pub struct WorkflowWorld {
    pub store: Arc<InMemoryTrackerStore>,
    pub users: Arc<InMemoryUserDirectory>,
    pub notifier: Arc<RecordingNotifier>,
    pub tasks: TestTaskService,
    pub sequencer: TestSequencer,
    pub project: Option<Project>,
    pub task: Option<Task>,
    pub last_step: Option<TaskStep>,
    pub last_swap: Option<StatusSwap>,
}

impl WorkflowWorld {
    /// Creates a world with an empty store.
    ///
    /// # Panics
    ///
    /// Panics if the built-in sender address is rejected.
    #[must_use]
    #[expect(
        clippy::expect_used,
        reason = "The sender address is a valid literal"
    )]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryTrackerStore::new());
        let users = Arc::new(InMemoryUserDirectory::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let clock = Arc::new(DefaultClock);
        let sender = EmailAddress::new("noreply@zira.local").expect("valid sender");
        let notifications = TaskNotificationService::new(
            Arc::clone(&store),
            Arc::clone(&users),
            Arc::clone(&notifier),
            NotificationSettings::new(sender),
        );

        Self {
            tasks: TaskService::new(
                Arc::clone(&store),
                Arc::clone(&clock),
                notifications.clone(),
            ),
            sequencer: StatusSequencer::new(Arc::clone(&store), clock, notifications),
            store,
            users,
            notifier,
            project: None,
            task: None,
            last_step: None,
            last_swap: None,
        }
    }

    /// Returns the scenario's project.
    ///
    /// # Errors
    ///
    /// Returns an error when no project has been created yet.
    pub fn project(&self) -> Result<&Project, eyre::Report> {
        self.project
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing project in scenario world"))
    }

    /// Returns the scenario's task.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been created yet.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Loads the project's statuses in workflow order.
    ///
    /// # Errors
    ///
    /// Returns an error when no project exists or the store fails.
    pub fn statuses(&self) -> Result<Vec<Status>, eyre::Report> {
        let project_id = self.project()?.id();
        let order = run_async(self.store.status_order(project_id))?;
        Ok(order.into_statuses())
    }

    /// Finds the project's status called `name`.
    ///
    /// # Errors
    ///
    /// Returns an error when the workflow has no such status.
    pub fn status_named(&self, name: &str) -> Result<Status, eyre::Report> {
        self.statuses()?
            .into_iter()
            .find(|status| status.name().as_str() == name)
            .ok_or_else(|| eyre::eyre!("no status named {name}"))
    }

    /// Registers a user reachable at `<name>@example.com`.
    ///
    /// # Errors
    ///
    /// Returns an error when the name is invalid or already taken.
    pub fn register(&self, name: &str) -> Result<User, eyre::Report> {
        let user = User::new(
            Username::new(name)?,
            Some(EmailAddress::new(format!("{name}@example.com"))?),
            &DefaultClock,
        );
        run_async(self.users.store(&user))?;
        Ok(user)
    }
}

impl Default for WorkflowWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> WorkflowWorld {
    WorkflowWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Splits a comma-separated list of status names.
#[must_use]
pub fn split_names(names: &str) -> Vec<String> {
    names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}
