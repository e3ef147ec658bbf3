//! Row locks shared by the transactional writes.
//!
//! Every transaction that touches both a project's statuses and one of its
//! tasks locks the statuses first, then the task row. Status deletion
//! follows the same order, since its `ON DELETE SET NULL` cascade writes
//! task rows. Status appends serialize on the project row instead, which
//! nothing else locks for update.

use diesel::pg::PgConnection;
use diesel::prelude::*;

use super::{
    conversion::{row_to_status, row_to_task},
    models::{StatusRow, TaskRow},
    schema::{projects, statuses, tasks},
};
use crate::tracker::{
    domain::{ProjectId, StatusId, StatusOrder, Task, TaskId},
    ports::{TrackerRepositoryError, TrackerRepositoryResult},
};

/// Loads a project's statuses as an ordered workflow and locks every row.
pub(super) fn lock_status_order(
    connection: &mut PgConnection,
    project_id: ProjectId,
) -> TrackerRepositoryResult<StatusOrder> {
    let statuses = statuses::table
        .filter(statuses::project_id.eq(project_id.into_inner()))
        .select(StatusRow::as_select())
        .for_update()
        .load::<StatusRow>(connection)?
        .into_iter()
        .map(row_to_status)
        .collect::<TrackerRepositoryResult<Vec<_>>>()?;
    Ok(StatusOrder::new(project_id, statuses))
}

/// Locks a task row and returns its current state.
pub(super) fn lock_task(
    connection: &mut PgConnection,
    task_id: TaskId,
) -> TrackerRepositoryResult<Task> {
    let row = tasks::table
        .find(task_id.into_inner())
        .select(TaskRow::as_select())
        .for_update()
        .first::<TaskRow>(connection)
        .optional()?
        .ok_or(TrackerRepositoryError::TaskNotFound(task_id))?;
    row_to_task(row)
}

/// Returns the project of a task without locking it.
///
/// A task never changes project, so the answer stays valid after the
/// statuses are locked.
pub(super) fn project_of_task(
    connection: &mut PgConnection,
    task_id: TaskId,
) -> TrackerRepositoryResult<ProjectId> {
    tasks::table
        .find(task_id.into_inner())
        .select(tasks::project_id)
        .first::<uuid::Uuid>(connection)
        .optional()?
        .map(ProjectId::from_uuid)
        .ok_or(TrackerRepositoryError::TaskNotFound(task_id))
}

/// Returns the project of a status without locking it.
pub(super) fn project_of_status(
    connection: &mut PgConnection,
    status_id: StatusId,
) -> TrackerRepositoryResult<ProjectId> {
    statuses::table
        .find(status_id.into_inner())
        .select(statuses::project_id)
        .first::<uuid::Uuid>(connection)
        .optional()?
        .map(ProjectId::from_uuid)
        .ok_or(TrackerRepositoryError::StatusNotFound(status_id))
}

/// Locks a project row against concurrent workflow appends.
///
/// `FOR NO KEY UPDATE` leaves foreign-key checks from task and sprint
/// inserts unblocked.
pub(super) fn lock_project(
    connection: &mut PgConnection,
    project_id: ProjectId,
) -> TrackerRepositoryResult<()> {
    projects::table
        .find(project_id.into_inner())
        .select(projects::id)
        .for_no_key_update()
        .first::<uuid::Uuid>(connection)
        .optional()?
        .map(|_| ())
        .ok_or(TrackerRepositoryError::ProjectNotFound(project_id))
}
