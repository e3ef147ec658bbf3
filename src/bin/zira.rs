//! `zira`: command-line request handler for the tracker.
//!
//! Usage:
//!
//! ```text
//! zira [--config zira.toml] [--database-url URL] <command>
//! ```
//!
//! Commands operate directly on the `PostgreSQL` store named in the
//! configuration. Run `zira migrate` once to create the tables.

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use zira::account::{
    adapters::postgres::PostgresUserDirectory,
    domain::{EmailAddress, User, UserId, Username},
    ports::UserDirectory,
};
use zira::config::ZiraConfig;
use zira::telemetry::init_tracing;
use zira::tracker::{
    adapters::{notify::TracingNotifier, postgres::PostgresTrackerStore},
    domain::{
        ProjectId, StatusId, StatusSwap, SwapDirection, Task, TaskEdit, TaskFilter, TaskId,
        TaskStep,
    },
    services::{
        CreateProjectRequest, CreateTaskRequest, ProjectService, SequencerError,
        StatusCatalogService, StatusSequencer, TaskNotificationService, TaskService,
    },
};

const SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_tracker_tables/up.sql");

type Store = PostgresTrackerStore;
type Directory = PostgresUserDirectory;

#[derive(Parser)]
#[command(name = "zira", version, about = "Project and task tracker")]
struct Cli {
    /// Configuration file (TOML). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides `database.url` from the configuration.
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the database tables
    Migrate,
    /// User management
    #[command(subcommand)]
    User(UserCommand),
    /// Project management
    #[command(subcommand)]
    Project(ProjectCommand),
    /// Workflow status management
    #[command(subcommand)]
    Status(StatusCommand),
    /// Task management
    #[command(subcommand)]
    Task(TaskCommand),
}

#[derive(Subcommand)]
enum UserCommand {
    /// Register a user
    Add {
        /// Unique login name
        username: String,
        /// Contact address for notifications
        #[arg(long)]
        email: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProjectCommand {
    /// Create a project with the default workflow
    Create {
        /// Project name
        name: String,
        /// Optional description
        #[arg(long)]
        description: Option<String>,
        #[command(flatten)]
        actor: Actor,
    },
    /// List projects
    List,
}

#[derive(Subcommand)]
enum StatusCommand {
    /// List a project's statuses in workflow order
    List {
        /// Project identifier
        project: Uuid,
    },
    /// Append a status to a project's workflow
    Add {
        /// Project identifier
        project: Uuid,
        /// Status name
        name: String,
        #[command(flatten)]
        actor: Actor,
    },
    /// Trade places with the neighbouring status
    Swap {
        /// Status identifier
        status: Uuid,
        /// `up` or `down`
        #[arg(value_parser = parse_direction)]
        direction: SwapDirection,
    },
}

#[derive(Subcommand)]
enum TaskCommand {
    /// Create a task
    Add {
        /// Project identifier
        project: Uuid,
        /// Task name
        name: String,
        /// Worker's username
        #[arg(long)]
        worker: Option<String>,
        /// Initial status identifier; defaults to the first status
        #[arg(long)]
        status: Option<Uuid>,
        #[command(flatten)]
        actor: Actor,
    },
    /// List tasks
    List {
        /// Only tasks of this project
        #[arg(long)]
        project: Option<Uuid>,
        /// Only tasks assigned to this username
        #[arg(long)]
        worker: Option<String>,
        /// Only tasks whose name contains this text (case-insensitive)
        #[arg(long)]
        name: Option<String>,
        /// Only completed (`true`) or open (`false`) tasks
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Assign a task to a worker
    Assign {
        /// Task identifier
        task: Uuid,
        /// Worker's username
        worker: String,
        #[command(flatten)]
        actor: Actor,
    },
    /// Move a task to the next status
    Advance {
        /// Task identifier
        task: Uuid,
        #[command(flatten)]
        actor: Actor,
    },
    /// Move a task to the previous status
    Retreat {
        /// Task identifier
        task: Uuid,
        #[command(flatten)]
        actor: Actor,
    },
}

#[derive(Args)]
struct Actor {
    /// Username of the acting user
    #[arg(long = "as", value_name = "USERNAME")]
    acting_user: Option<String>,
}

fn parse_direction(value: &str) -> Result<SwapDirection, String> {
    SwapDirection::try_from(value).map_err(|err| err.to_string())
}

struct App {
    users: Arc<Directory>,
    projects: ProjectService<Store, DefaultClock>,
    statuses: StatusCatalogService<Store, DefaultClock>,
    tasks: TaskService<Store, DefaultClock, Directory, TracingNotifier>,
    sequencer: StatusSequencer<Store, DefaultClock, Directory, TracingNotifier>,
}

impl App {
    fn new(pool: &Pool<ConnectionManager<PgConnection>>, config: &ZiraConfig) -> Result<Self> {
        let store = Arc::new(PostgresTrackerStore::new(pool.clone()));
        let users = Arc::new(PostgresUserDirectory::new(pool.clone()));
        let clock = Arc::new(DefaultClock);
        let notifications = TaskNotificationService::new(
            Arc::clone(&store),
            Arc::clone(&users),
            Arc::new(TracingNotifier::new()),
            config.notification_settings()?,
        );
        let default_statuses = config
            .default_status_names()?
            .into_iter()
            .map(|name| name.as_str().to_owned());
        Ok(Self {
            projects: ProjectService::new(Arc::clone(&store), Arc::clone(&clock))
                .with_default_statuses(default_statuses)?,
            statuses: StatusCatalogService::new(Arc::clone(&store), Arc::clone(&clock)),
            tasks: TaskService::new(
                Arc::clone(&store),
                Arc::clone(&clock),
                notifications.clone(),
            ),
            sequencer: StatusSequencer::new(store, clock, notifications),
            users,
        })
    }

    async fn user_id(&self, username: &str) -> Result<UserId> {
        let name = Username::new(username)?;
        self.users
            .find_by_username(&name)
            .await?
            .map(|user| user.id())
            .ok_or_else(|| anyhow!("unknown user: {username}"))
    }

    async fn actor_id(&self, actor: &Actor) -> Result<Option<UserId>> {
        match &actor.acting_user {
            Some(username) => Ok(Some(self.user_id(username).await?)),
            None => Ok(None),
        }
    }
}

fn sequencer_failure(err: SequencerError) -> anyhow::Error {
    if err.is_not_found() {
        anyhow!("not found: {err}")
    } else if err.is_invalid_state() {
        anyhow!("cannot move: {err}")
    } else {
        anyhow::Error::new(err)
    }
}

fn write_task(out: &mut impl Write, task: &Task) -> std::io::Result<()> {
    let status = task
        .status_id()
        .map_or_else(|| "-".to_owned(), |id| id.to_string());
    let state = if task.completion().is_completed() {
        "done"
    } else {
        "open"
    };
    writeln!(out, "{}\t{}\t{status}\t{state}", task.id(), task.name())
}

fn write_step(out: &mut impl Write, outcome: &TaskStep) -> std::io::Result<()> {
    match outcome {
        TaskStep::Moved { .. } => write!(out, "moved\t")?,
        TaskStep::Unchanged(_) => write!(out, "unchanged\t")?,
    }
    write_task(out, outcome.task())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => ZiraConfig::load(path)?,
        None => ZiraConfig::default(),
    };
    if let Some(url) = cli.database_url {
        config.database.url = url;
        config.validate()?;
    }
    init_tracing(&config.logging)?;

    let database = config.database.clone();
    let pool = tokio::task::spawn_blocking(move || {
        Pool::builder()
            .max_size(database.max_connections)
            .build(ConnectionManager::<PgConnection>::new(database.url))
    })
    .await?
    .context("failed to connect to PostgreSQL")?;

    if matches!(cli.command, Command::Migrate) {
        let migration_pool = pool.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            migration_pool.get()?.batch_execute(SCHEMA_SQL)?;
            Ok(())
        })
        .await??;
        writeln!(std::io::stdout().lock(), "schema ready")?;
        return Ok(());
    }

    let app = App::new(&pool, &config)?;
    let mut out = std::io::stdout().lock();
    match cli.command {
        Command::Migrate => {}
        Command::User(UserCommand::Add { username, email }) => {
            let user = User::new(
                Username::new(username)?,
                email.map(EmailAddress::new).transpose()?,
                &DefaultClock,
            );
            app.users.store(&user).await?;
            writeln!(out, "{}\t{}", user.id(), user.username())?;
        }
        Command::Project(ProjectCommand::Create {
            name,
            description,
            actor,
        }) => {
            let mut request = CreateProjectRequest::new(name);
            if let Some(text) = description {
                request = request.with_description(text);
            }
            if let Some(author) = app.actor_id(&actor).await? {
                request = request.with_author(author);
            }
            let project = app.projects.create(request).await?;
            writeln!(out, "{}\t{}", project.id(), project.name())?;
        }
        Command::Project(ProjectCommand::List) => {
            for project in app.projects.list().await? {
                writeln!(out, "{}\t{}", project.id(), project.name())?;
            }
        }
        Command::Status(StatusCommand::List { project }) => {
            let order = app.statuses.list(ProjectId::from_uuid(project)).await?;
            for status in order.statuses() {
                writeln!(out, "{}\t{}\t{}", status.rank(), status.id(), status.name())?;
            }
        }
        Command::Status(StatusCommand::Add {
            project,
            name,
            actor,
        }) => {
            let author = app.actor_id(&actor).await?;
            let status = app
                .statuses
                .create(ProjectId::from_uuid(project), &name, author)
                .await?;
            writeln!(out, "{}\t{}\t{}", status.rank(), status.id(), status.name())?;
        }
        Command::Status(StatusCommand::Swap { status, direction }) => {
            let outcome = app
                .sequencer
                .swap_priority(StatusId::from_uuid(status), direction)
                .await
                .map_err(sequencer_failure)?;
            match outcome {
                StatusSwap::Swapped { moved, displaced } => writeln!(
                    out,
                    "swapped\t{} now at {}, {} now at {}",
                    moved.name(),
                    moved.rank(),
                    displaced.name(),
                    displaced.rank()
                )?,
                StatusSwap::Unchanged(unmoved) => {
                    writeln!(out, "unchanged\t{} stays at {}", unmoved.name(), unmoved.rank())?;
                }
            }
        }
        Command::Task(TaskCommand::Add {
            project,
            name,
            worker,
            status,
            actor,
        }) => {
            let mut request = CreateTaskRequest::new(ProjectId::from_uuid(project), name);
            if let Some(username) = worker {
                request = request.with_worker(app.user_id(&username).await?);
            }
            if let Some(status_id) = status {
                request = request.with_status(StatusId::from_uuid(status_id));
            }
            if let Some(author) = app.actor_id(&actor).await? {
                request = request.with_author(author);
            }
            let task = app.tasks.create(request).await?;
            write_task(&mut out, &task)?;
        }
        Command::Task(TaskCommand::List {
            project,
            worker,
            name,
            completed,
        }) => {
            let mut filter = TaskFilter::new();
            if let Some(project_id) = project {
                filter = filter.in_project(ProjectId::from_uuid(project_id));
            }
            if let Some(username) = worker {
                filter = filter.assigned_to(app.user_id(&username).await?);
            }
            if let Some(fragment) = name {
                filter = filter.name_contains(fragment);
            }
            if let Some(is_completed) = completed {
                filter = filter.completed(is_completed);
            }
            for task in app.tasks.list(&filter).await? {
                write_task(&mut out, &task)?;
            }
        }
        Command::Task(TaskCommand::Assign {
            task,
            worker,
            actor,
        }) => {
            let worker_id = app.user_id(&worker).await?;
            let editor = app.actor_id(&actor).await?;
            let updated = app
                .tasks
                .update(
                    TaskId::from_uuid(task),
                    TaskEdit::new().with_worker(Some(worker_id)),
                    editor,
                )
                .await?;
            write_task(&mut out, &updated)?;
        }
        Command::Task(TaskCommand::Advance { task, actor }) => {
            let editor = app.actor_id(&actor).await?;
            let outcome = app
                .sequencer
                .advance(TaskId::from_uuid(task), editor)
                .await
                .map_err(sequencer_failure)?;
            write_step(&mut out, &outcome)?;
        }
        Command::Task(TaskCommand::Retreat { task, actor }) => {
            let editor = app.actor_id(&actor).await?;
            let outcome = app
                .sequencer
                .retreat(TaskId::from_uuid(task), editor)
                .await
                .map_err(sequencer_failure)?;
            write_step(&mut out, &outcome)?;
        }
    }
    Ok(())
}
