//! When steps for status workflow BDD scenarios.

use super::world::{WorkflowWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use zira::tracker::domain::{SwapDirection, TaskStep};

fn record_step(world: &mut WorkflowWorld, step: TaskStep) {
    world.task = Some(step.task().clone());
    world.last_step = Some(step);
}

#[when("the task is advanced")]
fn advance_task(world: &mut WorkflowWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let step = run_async(world.sequencer.advance(task_id, None)).wrap_err("advance task")?;
    record_step(world, step);
    Ok(())
}

#[when(r#"the task is advanced by "{editor}""#)]
fn advance_task_by(world: &mut WorkflowWorld, editor: String) -> Result<(), eyre::Report> {
    let acting = world.register(&editor)?;
    let task_id = world.task()?.id();
    let step = run_async(world.sequencer.advance(task_id, Some(acting.id())))
        .wrap_err("advance task on behalf of editor")?;
    record_step(world, step);
    Ok(())
}

#[when("the task is retreated")]
fn retreat_task(world: &mut WorkflowWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let step = run_async(world.sequencer.retreat(task_id, None)).wrap_err("retreat task")?;
    record_step(world, step);
    Ok(())
}

#[when(r#"status "{status}" is swapped "{direction}""#)]
fn swap_status(
    world: &mut WorkflowWorld,
    status: String,
    direction: String,
) -> Result<(), eyre::Report> {
    let parsed = SwapDirection::try_from(direction.as_str())?;
    let status_id = world.status_named(&status)?.id();
    let swap = run_async(world.sequencer.swap_priority(status_id, parsed))
        .wrap_err("swap status priority")?;
    world.last_swap = Some(swap);
    Ok(())
}
