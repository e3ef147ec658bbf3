//! Concurrent workflow moves against one in-memory store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::helpers::{Tracker, tracker};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::DefaultClock;
use rstest::rstest;
use tokio::task::JoinSet;
use zira::account::domain::{EmailAddress, UserId};
use zira::tracker::{
    adapters::memory::InMemoryTrackerStore,
    domain::{
        Project, ProjectId, Sprint, SprintId, Status, StatusId, StatusOrder, Step, SwapDirection,
        Task, TaskEdit, TaskFilter, TaskId, TaskRevision,
    },
    ports::{
        ProjectRepository, SprintRepository, StatusRepository, TaskRepository,
        TrackerRepositoryResult, WorkflowRepository,
    },
    services::{NotificationSettings, StatusCatalogService, TaskNotificationService, TaskService},
};

/// Store that advances a task one step right after the first lookup of it,
/// so a workflow move commits between a caller's read and its write.
struct AdvanceAfterFirstRead {
    inner: Arc<InMemoryTrackerStore>,
    armed: AtomicBool,
}

impl AdvanceAfterFirstRead {
    fn new(inner: Arc<InMemoryTrackerStore>) -> Self {
        Self {
            inner,
            armed: AtomicBool::new(true),
        }
    }
}

#[async_trait]
impl TaskRepository for AdvanceAfterFirstRead {
    async fn store_task(&self, task: &Task) -> TrackerRepositoryResult<()> {
        self.inner.store_task(task).await
    }

    async fn apply_task_edit(
        &self,
        id: TaskId,
        edit: TaskEdit,
        editor: Option<UserId>,
        at: DateTime<Utc>,
    ) -> TrackerRepositoryResult<TaskRevision> {
        self.inner.apply_task_edit(id, edit, editor, at).await
    }

    async fn find_task(&self, id: TaskId) -> TrackerRepositoryResult<Option<Task>> {
        let found = self.inner.find_task(id).await?;
        if self.armed.swap(false, Ordering::SeqCst) {
            self.inner
                .step_task(id, Step::Forward, None, Utc::now())
                .await?;
        }
        Ok(found)
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> TrackerRepositoryResult<Vec<Task>> {
        self.inner.list_tasks(filter).await
    }

    async fn delete_task(&self, id: TaskId) -> TrackerRepositoryResult<()> {
        self.inner.delete_task(id).await
    }
}

#[async_trait]
impl ProjectRepository for AdvanceAfterFirstRead {
    async fn store_project(&self, project: &Project) -> TrackerRepositoryResult<()> {
        self.inner.store_project(project).await
    }

    async fn store_project_with_workflow(
        &self,
        project: &Project,
        statuses: &[Status],
    ) -> TrackerRepositoryResult<()> {
        self.inner
            .store_project_with_workflow(project, statuses)
            .await
    }

    async fn update_project(&self, project: &Project) -> TrackerRepositoryResult<()> {
        self.inner.update_project(project).await
    }

    async fn find_project(&self, id: ProjectId) -> TrackerRepositoryResult<Option<Project>> {
        self.inner.find_project(id).await
    }

    async fn list_projects(&self) -> TrackerRepositoryResult<Vec<Project>> {
        self.inner.list_projects().await
    }

    async fn delete_project(&self, id: ProjectId) -> TrackerRepositoryResult<()> {
        self.inner.delete_project(id).await
    }
}

#[async_trait]
impl SprintRepository for AdvanceAfterFirstRead {
    async fn store_sprint(&self, sprint: &Sprint) -> TrackerRepositoryResult<()> {
        self.inner.store_sprint(sprint).await
    }

    async fn update_sprint(&self, sprint: &Sprint) -> TrackerRepositoryResult<()> {
        self.inner.update_sprint(sprint).await
    }

    async fn find_sprint(&self, id: SprintId) -> TrackerRepositoryResult<Option<Sprint>> {
        self.inner.find_sprint(id).await
    }

    async fn list_sprints(&self, project_id: ProjectId) -> TrackerRepositoryResult<Vec<Sprint>> {
        self.inner.list_sprints(project_id).await
    }

    async fn delete_sprint(&self, id: SprintId) -> TrackerRepositoryResult<()> {
        self.inner.delete_sprint(id).await
    }
}

#[async_trait]
impl StatusRepository for AdvanceAfterFirstRead {
    async fn store_status(&self, status: &Status) -> TrackerRepositoryResult<()> {
        self.inner.store_status(status).await
    }

    async fn append_status(&self, status: &Status) -> TrackerRepositoryResult<Status> {
        self.inner.append_status(status).await
    }

    async fn rename_status(&self, status: &Status) -> TrackerRepositoryResult<()> {
        self.inner.rename_status(status).await
    }

    async fn find_status(&self, id: StatusId) -> TrackerRepositoryResult<Option<Status>> {
        self.inner.find_status(id).await
    }

    async fn status_order(&self, project_id: ProjectId) -> TrackerRepositoryResult<StatusOrder> {
        self.inner.status_order(project_id).await
    }

    async fn delete_status(&self, id: StatusId) -> TrackerRepositoryResult<()> {
        self.inner.delete_status(id).await
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_advances_move_one_step_each(tracker: Tracker) {
    let project = tracker.project("Compiler").await;
    let task = tracker.task(&project, "Parser").await;

    let mut moves = JoinSet::new();
    for _ in 0..8 {
        let sequencer = Arc::clone(&tracker.sequencer);
        let task_id = task.id();
        moves.spawn(async move { sequencer.advance(task_id, None).await });
    }
    let mut moved = 0_usize;
    while let Some(joined) = moves.join_next().await {
        if joined.expect("move task joins").expect("advance succeeds").is_moved() {
            moved += 1;
        }
    }

    assert_eq!(moved, 3);
    assert_eq!(tracker.status_name_of(&task).await.as_deref(), Some("Done"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn edit_keeps_an_advance_committed_after_its_read(tracker: Tracker) {
    let project = tracker.project("Compiler").await;
    let task = tracker.task(&project, "Parser").await;
    let in_progress = tracker.status(&project, "In Progress").await;
    let racing = Arc::new(AdvanceAfterFirstRead::new(Arc::clone(&tracker.store)));
    let tasks = TaskService::new(
        Arc::clone(&racing),
        Arc::new(DefaultClock),
        TaskNotificationService::new(
            Arc::clone(&racing),
            Arc::clone(&tracker.users),
            Arc::clone(&tracker.notifier),
            NotificationSettings::new(
                EmailAddress::new("noreply@zira.local").expect("valid sender"),
            ),
        ),
    );

    let updated = tasks
        .update(
            task.id(),
            TaskEdit::new().with_description(Some("Handle trailing commas".to_owned())),
            None,
        )
        .await
        .expect("update succeeds");

    assert_eq!(updated.status_id(), Some(in_progress.id()));
    assert_eq!(updated.description(), Some("Handle trailing commas"));
    assert_eq!(
        tracker.status_name_of(&task).await.as_deref(),
        Some("In Progress")
    );
    assert!(tracker.notifier.messages().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_edits_and_advances_keep_every_move(tracker: Tracker) {
    let project = tracker.project("Compiler").await;
    let task = tracker.task(&project, "Parser").await;

    let mut advances = JoinSet::new();
    let mut edits = JoinSet::new();
    for round in 0..6 {
        let sequencer = Arc::clone(&tracker.sequencer);
        let store = Arc::clone(&tracker.store);
        let task_id = task.id();
        advances.spawn(async move { sequencer.advance(task_id, None).await });
        edits.spawn(async move {
            store
                .apply_task_edit(
                    task_id,
                    TaskEdit::new().with_description(Some(format!("revision {round}"))),
                    None,
                    Utc::now(),
                )
                .await
        });
    }
    let mut moved = 0_usize;
    while let Some(joined) = advances.join_next().await {
        if joined.expect("move task joins").expect("advance succeeds").is_moved() {
            moved += 1;
        }
    }
    while let Some(joined) = edits.join_next().await {
        joined.expect("edit task joins").expect("edit succeeds");
    }

    assert_eq!(moved, 3);
    assert_eq!(tracker.status_name_of(&task).await.as_deref(), Some("Done"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_appends_take_distinct_ranks(tracker: Tracker) {
    let project = tracker.project("Compiler").await;
    let catalog = Arc::new(StatusCatalogService::new(
        Arc::clone(&tracker.store),
        Arc::new(DefaultClock),
    ));

    let mut appends = JoinSet::new();
    for name in ["Blocked", "Deployed", "Verified", "Archived"] {
        let statuses = Arc::clone(&catalog);
        let project_id = project.id();
        appends.spawn(async move { statuses.create(project_id, name, None).await });
    }
    while let Some(joined) = appends.join_next().await {
        joined.expect("append task joins").expect("append succeeds");
    }

    let order = tracker.order(&project).await;
    let ranks: Vec<u32> = order
        .statuses()
        .iter()
        .map(|status| status.rank().value())
        .collect();
    assert_eq!(ranks, [0, 1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(
        order.names().get(..4),
        Some(["Open", "In Progress", "Review", "Done"].as_slice())
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_swaps_keep_ranks_unique(tracker: Tracker) {
    let project = tracker.project("Compiler").await;
    let order = tracker.order(&project).await;

    let mut swaps = JoinSet::new();
    let directions = [SwapDirection::Down, SwapDirection::Up].into_iter().cycle();
    for (status, direction) in order.statuses().iter().zip(directions) {
        let sequencer = Arc::clone(&tracker.sequencer);
        let status_id = status.id();
        swaps.spawn(async move { sequencer.swap_priority(status_id, direction).await });
    }
    while let Some(joined) = swaps.join_next().await {
        joined.expect("swap task joins").expect("swap succeeds");
    }

    let after = tracker.order(&project).await;
    let mut ranks: Vec<u32> = after
        .statuses()
        .iter()
        .map(|status| status.rank().value())
        .collect();
    ranks.sort_unstable();
    ranks.dedup();
    assert_eq!(ranks, [0, 1, 2, 3]);
    let mut names = after.names();
    names.sort_unstable();
    assert_eq!(names, ["Done", "In Progress", "Open", "Review"]);
}
