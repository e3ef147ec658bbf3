use async_trait::async_trait;

use super::{InMemoryTrackerStore, Stored, TrackerState, poisoned};
use crate::tracker::{
    domain::{EntityKind, ProjectId, Status, StatusId, StatusOrder},
    ports::{StatusRepository, TrackerRepositoryError, TrackerRepositoryResult},
};

impl TrackerState {
    /// Inserts a status after checking its identifier, project and rank.
    pub(super) fn insert_status(&mut self, status: &Status) -> TrackerRepositoryResult<()> {
        if self.statuses.contains_key(&status.id()) {
            return Err(TrackerRepositoryError::Duplicate(
                EntityKind::Status,
                status.id().into_inner(),
            ));
        }
        if !self.projects.contains_key(&status.project_id()) {
            return Err(TrackerRepositoryError::ProjectNotFound(status.project_id()));
        }
        let rank_taken = self.statuses.values().any(|entry| {
            entry.value.project_id() == status.project_id() && entry.value.rank() == status.rank()
        });
        if rank_taken {
            return Err(TrackerRepositoryError::DuplicateStatusRank {
                project_id: status.project_id(),
                rank: status.rank(),
            });
        }
        let sequence = self.take_sequence();
        self.statuses.insert(
            status.id(),
            Stored {
                sequence,
                value: status.clone(),
            },
        );
        Ok(())
    }
}

#[async_trait]
impl StatusRepository for InMemoryTrackerStore {
    async fn store_status(&self, status: &Status) -> TrackerRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.insert_status(status)
    }

    async fn append_status(&self, status: &Status) -> TrackerRepositoryResult<Status> {
        let mut state = self.state.write().map_err(poisoned)?;
        if !state.projects.contains_key(&status.project_id()) {
            return Err(TrackerRepositoryError::ProjectNotFound(status.project_id()));
        }
        let mut appended = status.clone();
        appended.place_at(state.status_order(status.project_id()).next_rank()?);
        state.insert_status(&appended)?;
        Ok(appended)
    }

    async fn rename_status(&self, status: &Status) -> TrackerRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let entry = state
            .statuses
            .get_mut(&status.id())
            .ok_or(TrackerRepositoryError::StatusNotFound(status.id()))?;
        entry.value.take_name_from(status);
        Ok(())
    }

    async fn find_status(&self, id: StatusId) -> TrackerRepositoryResult<Option<Status>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.statuses.get(&id).map(|entry| entry.value.clone()))
    }

    async fn status_order(&self, project_id: ProjectId) -> TrackerRepositoryResult<StatusOrder> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.status_order(project_id))
    }

    async fn delete_status(&self, id: StatusId) -> TrackerRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.statuses.remove(&id).is_none() {
            return Err(TrackerRepositoryError::StatusNotFound(id));
        }
        state
            .tasks
            .values_mut()
            .filter(|entry| entry.value.status_id() == Some(id))
            .for_each(|entry| entry.value.detach_status());
        Ok(())
    }
}
