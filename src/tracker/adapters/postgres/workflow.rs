//! Transactional workflow moves.
//!
//! Both moves run in one transaction that locks every status of the project
//! with `SELECT ... FOR UPDATE` before the acted-upon task, following the
//! order set out in [`super::locks`]. Concurrent moves in the same project
//! queue behind that lock, so positions are never computed from a stale
//! order. The `(project_id, rank)` unique constraint is deferred to commit,
//! which lets a swap write both ranks in turn.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;

use super::{
    conversion::rank_to_column,
    locks::{lock_status_order, lock_task, project_of_status, project_of_task},
    repository::PostgresTrackerStore,
    schema::{statuses, tasks},
};
use crate::account::domain::UserId;
use crate::tracker::{
    domain::{Status, StatusId, StatusSwap, Step, SwapDirection, TaskId, TaskStep},
    ports::{TrackerRepositoryError, TrackerRepositoryResult, WorkflowRepository},
};

fn write_rank(connection: &mut PgConnection, status: &Status) -> TrackerRepositoryResult<()> {
    diesel::update(statuses::table.find(status.id().into_inner()))
        .set((
            statuses::rank.eq(rank_to_column(status.rank())?),
            statuses::updated_at.eq(status.updated_at()),
        ))
        .execute(connection)?;
    Ok(())
}

fn step_in_transaction(
    connection: &mut PgConnection,
    task_id: TaskId,
    step: Step,
    editor: Option<UserId>,
    at: DateTime<Utc>,
) -> TrackerRepositoryResult<TaskStep> {
    let project_id = project_of_task(connection, task_id)?;
    let order = lock_status_order(connection, project_id)?;
    let before = lock_task(connection, task_id)?;
    let Some(target) = order.step_target(&before, step)? else {
        return Ok(TaskStep::Unchanged(Box::new(before)));
    };

    let mut after = before.clone();
    after.move_to_status(target, editor, at);
    diesel::update(tasks::table.find(task_id.into_inner()))
        .set((
            tasks::status_id.eq(Some(target.into_inner())),
            tasks::last_editor_id.eq(editor.map(UserId::into_inner)),
            tasks::updated_at.eq(at),
        ))
        .execute(connection)?;
    Ok(TaskStep::Moved {
        before: Box::new(before),
        after: Box::new(after),
    })
}

fn swap_in_transaction(
    connection: &mut PgConnection,
    status_id: StatusId,
    direction: SwapDirection,
    at: DateTime<Utc>,
) -> TrackerRepositoryResult<StatusSwap> {
    let project_id = project_of_status(connection, status_id)?;
    let order = lock_status_order(connection, project_id)?;
    // The status may have been deleted between the lookup and the lock.
    let mut moved = order
        .get(status_id)
        .cloned()
        .ok_or(TrackerRepositoryError::StatusNotFound(status_id))?;
    let Some(partner_id) = order.swap_partner(status_id, direction)? else {
        return Ok(StatusSwap::Unchanged(moved));
    };
    let mut displaced = order
        .get(partner_id)
        .cloned()
        .ok_or(TrackerRepositoryError::StatusNotFound(partner_id))?;

    moved.swap_rank_with(&mut displaced, at);
    write_rank(connection, &moved)?;
    write_rank(connection, &displaced)?;
    Ok(StatusSwap::Swapped { moved, displaced })
}

#[async_trait]
impl WorkflowRepository for PostgresTrackerStore {
    async fn step_task(
        &self,
        task_id: TaskId,
        step: Step,
        editor: Option<UserId>,
        at: DateTime<Utc>,
    ) -> TrackerRepositoryResult<TaskStep> {
        self.run_blocking(move |connection| {
            connection.transaction(|transaction| {
                step_in_transaction(transaction, task_id, step, editor, at)
            })
        })
        .await
    }

    async fn swap_status(
        &self,
        status_id: StatusId,
        direction: SwapDirection,
        at: DateTime<Utc>,
    ) -> TrackerRepositoryResult<StatusSwap> {
        self.run_blocking(move |connection| {
            connection.transaction(|transaction| {
                swap_in_transaction(transaction, status_id, direction, at)
            })
        })
        .await
    }
}
