//! Repository contract of the in-memory tracker store.

use chrono::Utc;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use zira::tracker::{
    adapters::memory::InMemoryTrackerStore,
    domain::{
        EntityKind, ItemName, NewTask, Project, ProjectId, Status, StatusId, StatusRank, Step,
        Task, TaskEdit, TaskFilter,
    },
    ports::{
        ProjectRepository, StatusRepository, TaskRepository, TrackerRepositoryError,
        WorkflowRepository,
    },
};

#[fixture]
fn store() -> InMemoryTrackerStore {
    InMemoryTrackerStore::new()
}

fn project(name: &str) -> Project {
    Project::new(
        ItemName::new(EntityKind::Project, name).expect("valid name"),
        None,
        None,
        None,
        &DefaultClock,
    )
}

fn status(project_id: ProjectId, name: &str, rank: u32) -> Status {
    Status::new(
        project_id,
        ItemName::new(EntityKind::Status, name).expect("valid name"),
        StatusRank::new(rank).expect("valid rank"),
        None,
        &DefaultClock,
    )
}

fn task(project_id: ProjectId, status_id: Option<StatusId>) -> Task {
    Task::new(
        NewTask {
            project_id,
            name: ItemName::new(EntityKind::Task, "Parser").expect("valid name"),
            description: None,
            author: None,
            worker: None,
            sprint_id: None,
            status_id,
            finish_by: None,
        },
        &DefaultClock,
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rank_is_unique_per_project(store: InMemoryTrackerStore) {
    let first = project("Compiler");
    let second = project("Runtime");
    store.store_project(&first).await.expect("project stored");
    store.store_project(&second).await.expect("project stored");
    store
        .store_status(&status(first.id(), "Open", 0))
        .await
        .expect("status stored");

    let clash = store.store_status(&status(first.id(), "Todo", 0)).await;
    let elsewhere = store.store_status(&status(second.id(), "Open", 0)).await;

    assert!(matches!(
        clash,
        Err(TrackerRepositoryError::DuplicateStatusRank { project_id, rank })
            if project_id == first.id() && rank == StatusRank::FIRST
    ));
    assert!(elsewhere.is_ok());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rows_must_reference_existing_parents(store: InMemoryTrackerStore) {
    let orphan = ProjectId::new();
    let home = project("Compiler");
    store.store_project(&home).await.expect("project stored");
    let ghost_status = StatusId::new();

    let status_err = store
        .store_status(&status(orphan, "Open", 0))
        .await
        .expect_err("project is missing");
    let task_err = store
        .store_task(&task(home.id(), Some(ghost_status)))
        .await
        .expect_err("status is missing");

    assert!(matches!(status_err, TrackerRepositoryError::ProjectNotFound(id) if id == orphan));
    assert!(
        matches!(task_err, TrackerRepositoryError::StatusNotFound(id) if id == ghost_status)
    );
    assert!(status_err.is_not_found() && task_err.is_not_found());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_identifiers_are_rejected(store: InMemoryTrackerStore) {
    let home = project("Compiler");
    store.store_project(&home).await.expect("project stored");
    let stored = task(home.id(), None);
    store.store_task(&stored).await.expect("task stored");

    let again = store.store_project(&home).await;
    let task_again = store.store_task(&stored).await;

    assert!(matches!(again, Err(TrackerRepositoryError::Duplicate(EntityKind::Project, _))));
    assert!(matches!(task_again, Err(TrackerRepositoryError::Duplicate(EntityKind::Task, _))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listings_keep_creation_order(store: InMemoryTrackerStore) {
    let names = ["Gamma", "Alpha", "Beta"];
    let mut expected = Vec::new();
    for name in names {
        let created = project(name);
        store.store_project(&created).await.expect("project stored");
        expected.push(created.id());
    }
    let home = expected.first().copied().expect("projects created");
    for _ in 0..3 {
        store
            .store_task(&task(home, None))
            .await
            .expect("task stored");
    }

    let listed: Vec<ProjectId> = store
        .list_projects()
        .await
        .expect("projects listed")
        .iter()
        .map(Project::id)
        .collect();
    let tasks = store
        .list_tasks(&TaskFilter::new().in_project(home))
        .await
        .expect("tasks listed");

    assert_eq!(listed, expected);
    assert_eq!(tasks.len(), 3);
    assert!(tasks.windows(2).all(|pair| match pair {
        [earlier, later] => earlier.created_at() <= later.created_at(),
        _ => false,
    }));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_edits_build_on_the_stored_task(store: InMemoryTrackerStore) {
    let home = project("Compiler");
    let open = status(home.id(), "Open", 0);
    let doing = status(home.id(), "Doing", 1);
    store.store_project(&home).await.expect("project stored");
    store.store_status(&open).await.expect("status stored");
    store.store_status(&doing).await.expect("status stored");
    let created = task(home.id(), Some(open.id()));
    store.store_task(&created).await.expect("task stored");

    store
        .step_task(created.id(), Step::Forward, None, Utc::now())
        .await
        .expect("task advances");
    let revision = store
        .apply_task_edit(
            created.id(),
            TaskEdit::new().with_description(Some("Handle trailing commas".to_owned())),
            None,
            Utc::now(),
        )
        .await
        .expect("edit applies");
    let stored = store
        .find_task(created.id())
        .await
        .expect("task lookup")
        .expect("task exists");

    assert_eq!(revision.before.status_id(), Some(doing.id()));
    assert_eq!(revision.before.description(), None);
    assert_eq!(revision.after, stored);
    assert_eq!(stored.status_id(), Some(doing.id()));
    assert_eq!(stored.description(), Some("Handle trailing commas"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_edits_reject_missing_rows(store: InMemoryTrackerStore) {
    let home = project("Compiler");
    store.store_project(&home).await.expect("project stored");
    let created = task(home.id(), None);
    store.store_task(&created).await.expect("task stored");
    let ghost_status = StatusId::new();

    let missing_task = store
        .apply_task_edit(task(home.id(), None).id(), TaskEdit::new(), None, Utc::now())
        .await;
    let missing_status = store
        .apply_task_edit(
            created.id(),
            TaskEdit::new().with_status(Some(ghost_status)),
            None,
            Utc::now(),
        )
        .await;
    let unchanged = store
        .find_task(created.id())
        .await
        .expect("task lookup")
        .expect("task exists");

    assert!(matches!(missing_task, Err(TrackerRepositoryError::TaskNotFound(_))));
    assert!(matches!(
        missing_status,
        Err(TrackerRepositoryError::StatusNotFound(id)) if id == ghost_status
    ));
    assert_eq!(unchanged, created);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn appends_take_the_rank_after_the_last_status(store: InMemoryTrackerStore) {
    let home = project("Compiler");
    store.store_project(&home).await.expect("project stored");
    store
        .store_status(&status(home.id(), "Open", 0))
        .await
        .expect("status stored");
    store
        .store_status(&status(home.id(), "Done", 5))
        .await
        .expect("status stored");

    let appended = store
        .append_status(&status(home.id(), "Archived", 0))
        .await
        .expect("status appended");
    let orphan = ProjectId::new();
    let missing = store.append_status(&status(orphan, "Open", 0)).await;

    assert_eq!(appended.rank().value(), 6);
    assert_eq!(
        store
            .status_order(home.id())
            .await
            .expect("status order loads")
            .names(),
        ["Open", "Done", "Archived"]
    );
    assert!(matches!(missing, Err(TrackerRepositoryError::ProjectNotFound(id)) if id == orphan));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_seeding_stores_everything_or_nothing(store: InMemoryTrackerStore) {
    let seeded = project("Compiler");
    let workflow = [
        status(seeded.id(), "Open", 0),
        status(seeded.id(), "Done", 1),
    ];
    let broken = project("Runtime");
    let clashing = [
        status(broken.id(), "Open", 0),
        status(broken.id(), "Todo", 0),
    ];

    store
        .store_project_with_workflow(&seeded, &workflow)
        .await
        .expect("project seeded");
    let failed = store.store_project_with_workflow(&broken, &clashing).await;

    assert_eq!(
        store
            .status_order(seeded.id())
            .await
            .expect("status order loads")
            .names(),
        ["Open", "Done"]
    );
    assert!(matches!(
        failed,
        Err(TrackerRepositoryError::DuplicateStatusRank { project_id, .. })
            if project_id == broken.id()
    ));
    assert!(
        store
            .find_project(broken.id())
            .await
            .expect("project lookup")
            .is_none()
    );
    let first_status = clashing.first().map(Status::id).expect("workflow has statuses");
    assert!(
        store
            .find_status(first_status)
            .await
            .expect("status lookup")
            .is_none()
    );
    assert!(
        store
            .status_order(broken.id())
            .await
            .expect("status order loads")
            .is_empty()
    );
}
