//! Workflow moves driven through the public services.

use super::helpers::{Tracker, tracker};
use rstest::rstest;
use zira::tracker::domain::{StatusSwap, SwapDirection, TaskEdit};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_walks_the_whole_workflow(tracker: Tracker) {
    let project = tracker.project("Compiler").await;
    let task = tracker.task(&project, "Parser").await;
    let mut visited = vec![tracker.status_name_of(&task).await];

    for _ in 0..4 {
        tracker
            .sequencer
            .advance(task.id(), None)
            .await
            .expect("advance succeeds");
        visited.push(tracker.status_name_of(&task).await);
    }

    let expected = ["Open", "In Progress", "Review", "Done", "Done"]
        .map(|name| Some(name.to_owned()));
    assert_eq!(visited, expected);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reordered_workflow_changes_the_next_step(tracker: Tracker) {
    let project = tracker.project("Compiler").await;
    let task = tracker.task(&project, "Parser").await;
    let review = tracker.status(&project, "Review").await;

    let swap = tracker
        .sequencer
        .swap_priority(review.id(), SwapDirection::Up)
        .await
        .expect("swap succeeds");
    tracker
        .sequencer
        .advance(task.id(), None)
        .await
        .expect("advance succeeds");

    assert!(matches!(swap, StatusSwap::Swapped { ref displaced, .. }
        if displaced.name().as_str() == "In Progress"));
    assert_eq!(
        tracker.order(&project).await.names(),
        ["Open", "Review", "In Progress", "Done"]
    );
    assert_eq!(
        tracker.status_name_of(&task).await.as_deref(),
        Some("Review")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_edit_and_advance_both_notify_the_worker(tracker: Tracker) {
    let project = tracker.project("Compiler").await;
    let worker = tracker.user("grace").await;
    let editor = tracker.user("ada").await;
    let task = tracker.task(&project, "Parser").await;

    tracker
        .tasks
        .update(
            task.id(),
            TaskEdit::new().with_worker(Some(worker.id())),
            Some(editor.id()),
        )
        .await
        .expect("task assigned");
    tracker
        .sequencer
        .advance(task.id(), Some(editor.id()))
        .await
        .expect("advance succeeds");

    let subjects: Vec<String> = tracker
        .notifier
        .messages()
        .into_iter()
        .map(|message| message.subject)
        .collect();
    assert_eq!(subjects, ["Task assigned to you", "Task status changed"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn projects_do_not_share_workflows(tracker: Tracker) {
    let first = tracker.project("Compiler").await;
    let second = tracker.project("Runtime").await;
    let first_open = tracker.status(&first, "Open").await;

    tracker
        .sequencer
        .swap_priority(first_open.id(), SwapDirection::Down)
        .await
        .expect("swap succeeds");

    assert_eq!(
        tracker.order(&first).await.names(),
        ["In Progress", "Open", "Review", "Done"]
    );
    assert_eq!(
        tracker.order(&second).await.names(),
        ["Open", "In Progress", "Review", "Done"]
    );
}
