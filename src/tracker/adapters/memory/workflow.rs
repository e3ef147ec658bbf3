//! Workflow moves applied under the store's write guard.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{InMemoryTrackerStore, poisoned, replace};
use crate::account::domain::UserId;
use crate::tracker::{
    domain::{StatusId, StatusSwap, Step, SwapDirection, TaskId, TaskStep},
    ports::{TrackerRepositoryError, TrackerRepositoryResult, WorkflowRepository},
};

#[async_trait]
impl WorkflowRepository for InMemoryTrackerStore {
    async fn step_task(
        &self,
        task_id: TaskId,
        step: Step,
        editor: Option<UserId>,
        at: DateTime<Utc>,
    ) -> TrackerRepositoryResult<TaskStep> {
        let mut state = self.state.write().map_err(poisoned)?;
        let before = state
            .tasks
            .get(&task_id)
            .map(|entry| entry.value.clone())
            .ok_or(TrackerRepositoryError::TaskNotFound(task_id))?;
        let order = state.status_order(before.project_id());
        let Some(target) = order.step_target(&before, step)? else {
            return Ok(TaskStep::Unchanged(Box::new(before)));
        };

        let mut after = before.clone();
        after.move_to_status(target, editor, at);
        replace(&mut state.tasks, &task_id, after.clone());
        Ok(TaskStep::Moved {
            before: Box::new(before),
            after: Box::new(after),
        })
    }

    async fn swap_status(
        &self,
        status_id: StatusId,
        direction: SwapDirection,
        at: DateTime<Utc>,
    ) -> TrackerRepositoryResult<StatusSwap> {
        let mut state = self.state.write().map_err(poisoned)?;
        let mut moved = state
            .statuses
            .get(&status_id)
            .map(|entry| entry.value.clone())
            .ok_or(TrackerRepositoryError::StatusNotFound(status_id))?;
        let order = state.status_order(moved.project_id());
        let Some(partner_id) = order.swap_partner(status_id, direction)? else {
            return Ok(StatusSwap::Unchanged(moved));
        };
        let mut displaced = state
            .statuses
            .get(&partner_id)
            .map(|entry| entry.value.clone())
            .ok_or(TrackerRepositoryError::StatusNotFound(partner_id))?;

        moved.swap_rank_with(&mut displaced, at);
        replace(&mut state.statuses, &status_id, moved.clone());
        replace(&mut state.statuses, &partner_id, displaced.clone());
        Ok(StatusSwap::Swapped { moved, displaced })
    }
}
