//! Then steps for status workflow BDD scenarios.

use super::world::{WorkflowWorld, split_names};
use rstest_bdd_macros::then;
use zira::tracker::domain::{StatusSwap, TaskStep};

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &WorkflowWorld, status: String) -> Result<(), eyre::Report> {
    let expected = world.status_named(&status)?;
    let task = world.task()?;
    eyre::ensure!(
        task.status_id() == Some(expected.id()),
        "expected task at {status}, found status {:?}",
        task.status_id()
    );
    Ok(())
}

#[then("the last move left the task unchanged")]
fn last_move_unchanged(world: &WorkflowWorld) -> Result<(), eyre::Report> {
    let step = world
        .last_step
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing move result"))?;
    eyre::ensure!(
        matches!(step, TaskStep::Unchanged(_)),
        "expected an unchanged task, got {step:?}"
    );
    Ok(())
}

#[then("the last swap left the workflow unchanged")]
fn last_swap_unchanged(world: &WorkflowWorld) -> Result<(), eyre::Report> {
    let swap = world
        .last_swap
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing swap result"))?;
    eyre::ensure!(
        matches!(swap, StatusSwap::Unchanged(_)),
        "expected an unchanged workflow, got {swap:?}"
    );
    Ok(())
}

#[then(r#"the workflow order is "{names}""#)]
fn workflow_order_is(world: &WorkflowWorld, names: String) -> Result<(), eyre::Report> {
    let actual: Vec<String> = world
        .statuses()?
        .iter()
        .map(|status| status.name().as_str().to_owned())
        .collect();
    let expected = split_names(&names);
    eyre::ensure!(
        actual == expected,
        "expected workflow {expected:?}, found {actual:?}"
    );
    Ok(())
}

#[then(r#""{address}" received {count:usize} notification"#)]
fn received_notifications(
    world: &WorkflowWorld,
    address: String,
    count: usize,
) -> Result<(), eyre::Report> {
    let received = world
        .notifier
        .messages()
        .iter()
        .filter(|message| message.to.as_str() == address)
        .count();
    eyre::ensure!(
        received == count,
        "expected {count} notifications to {address}, found {received}"
    );
    Ok(())
}
