//! Given steps for status workflow BDD scenarios.

use std::sync::Arc;

use super::world::{WorkflowWorld, run_async, split_names};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest_bdd_macros::given;
use zira::tracker::services::{CreateProjectRequest, CreateTaskRequest, ProjectService};

#[given(r#"a project with statuses "{names}""#)]
fn project_with_statuses(world: &mut WorkflowWorld, names: String) -> Result<(), eyre::Report> {
    let projects = ProjectService::new(Arc::clone(&world.store), Arc::new(DefaultClock))
        .with_default_statuses(split_names(&names))
        .wrap_err("configure workflow")?;
    let project = run_async(projects.create(CreateProjectRequest::new("Zira")))
        .wrap_err("create project for workflow scenario")?;
    world.project = Some(project);
    Ok(())
}

#[given(r#"a task at status "{status}""#)]
fn task_at_status(world: &mut WorkflowWorld, status: String) -> Result<(), eyre::Report> {
    let request = CreateTaskRequest::new(world.project()?.id(), "Parser")
        .with_status(world.status_named(&status)?.id());
    let task = run_async(world.tasks.create(request)).wrap_err("create task")?;
    world.task = Some(task);
    Ok(())
}

#[given(r#"a worker "{worker}" has a task at status "{status}""#)]
fn assigned_task_at_status(
    world: &mut WorkflowWorld,
    worker: String,
    status: String,
) -> Result<(), eyre::Report> {
    let assignee = world.register(&worker)?;
    let request = CreateTaskRequest::new(world.project()?.id(), "Parser")
        .with_status(world.status_named(&status)?.id())
        .with_worker(assignee.id());
    let task = run_async(world.tasks.create(request)).wrap_err("create assigned task")?;
    world.task = Some(task);
    Ok(())
}
