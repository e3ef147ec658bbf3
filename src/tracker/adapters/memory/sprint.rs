use async_trait::async_trait;

use super::{InMemoryTrackerStore, Stored, in_insertion_order, poisoned, replace};
use crate::tracker::{
    domain::{EntityKind, ProjectId, Sprint, SprintId},
    ports::{SprintRepository, TrackerRepositoryError, TrackerRepositoryResult},
};

#[async_trait]
impl SprintRepository for InMemoryTrackerStore {
    async fn store_sprint(&self, sprint: &Sprint) -> TrackerRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.sprints.contains_key(&sprint.id()) {
            return Err(TrackerRepositoryError::Duplicate(
                EntityKind::Sprint,
                sprint.id().into_inner(),
            ));
        }
        if !state.projects.contains_key(&sprint.project_id()) {
            return Err(TrackerRepositoryError::ProjectNotFound(sprint.project_id()));
        }
        let sequence = state.take_sequence();
        state.sprints.insert(
            sprint.id(),
            Stored {
                sequence,
                value: sprint.clone(),
            },
        );
        Ok(())
    }

    async fn update_sprint(&self, sprint: &Sprint) -> TrackerRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if replace(&mut state.sprints, &sprint.id(), sprint.clone()) {
            Ok(())
        } else {
            Err(TrackerRepositoryError::SprintNotFound(sprint.id()))
        }
    }

    async fn find_sprint(&self, id: SprintId) -> TrackerRepositoryResult<Option<Sprint>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.sprints.get(&id).map(|entry| entry.value.clone()))
    }

    async fn list_sprints(&self, project_id: ProjectId) -> TrackerRepositoryResult<Vec<Sprint>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(in_insertion_order(
            state
                .sprints
                .values()
                .filter(|entry| entry.value.project_id() == project_id),
        ))
    }

    async fn delete_sprint(&self, id: SprintId) -> TrackerRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.sprints.remove(&id).is_none() {
            return Err(TrackerRepositoryError::SprintNotFound(id));
        }
        state
            .tasks
            .values_mut()
            .filter(|entry| entry.value.sprint_id() == Some(id))
            .for_each(|entry| entry.value.detach_sprint());
        Ok(())
    }
}
