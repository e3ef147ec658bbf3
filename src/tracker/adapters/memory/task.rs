use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{InMemoryTrackerStore, Stored, in_insertion_order, poisoned, replace};
use crate::account::domain::UserId;
use crate::tracker::{
    domain::{EntityKind, Task, TaskEdit, TaskFilter, TaskId, TaskRevision},
    ports::{TaskRepository, TrackerRepositoryError, TrackerRepositoryResult},
};

#[async_trait]
impl TaskRepository for InMemoryTrackerStore {
    async fn store_task(&self, task: &Task) -> TrackerRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TrackerRepositoryError::Duplicate(
                EntityKind::Task,
                task.id().into_inner(),
            ));
        }
        state.check_task_links(task)?;
        let sequence = state.take_sequence();
        state.tasks.insert(
            task.id(),
            Stored {
                sequence,
                value: task.clone(),
            },
        );
        Ok(())
    }

    async fn apply_task_edit(
        &self,
        id: TaskId,
        edit: TaskEdit,
        editor: Option<UserId>,
        at: DateTime<Utc>,
    ) -> TrackerRepositoryResult<TaskRevision> {
        let mut state = self.state.write().map_err(poisoned)?;
        let before = state
            .tasks
            .get(&id)
            .map(|entry| entry.value.clone())
            .ok_or(TrackerRepositoryError::TaskNotFound(id))?;
        let mut after = before.clone();
        after.apply_at(edit, editor, at);
        state.check_task_links(&after)?;
        replace(&mut state.tasks, &id, after.clone());
        Ok(TaskRevision { before, after })
    }

    async fn find_task(&self, id: TaskId) -> TrackerRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.tasks.get(&id).map(|entry| entry.value.clone()))
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> TrackerRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(in_insertion_order(
            state
                .tasks
                .values()
                .filter(|entry| filter.matches(&entry.value)),
        ))
    }

    async fn delete_task(&self, id: TaskId) -> TrackerRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(TrackerRepositoryError::TaskNotFound(id))
    }
}
