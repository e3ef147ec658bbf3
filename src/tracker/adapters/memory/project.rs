use async_trait::async_trait;

use super::{InMemoryTrackerStore, Stored, TrackerState, in_insertion_order, poisoned, replace};
use crate::tracker::{
    domain::{EntityKind, Project, ProjectId, Status},
    ports::{ProjectRepository, TrackerRepositoryError, TrackerRepositoryResult},
};

impl TrackerState {
    fn insert_project(&mut self, project: &Project) -> TrackerRepositoryResult<()> {
        if self.projects.contains_key(&project.id()) {
            return Err(TrackerRepositoryError::Duplicate(
                EntityKind::Project,
                project.id().into_inner(),
            ));
        }
        let sequence = self.take_sequence();
        self.projects.insert(
            project.id(),
            Stored {
                sequence,
                value: project.clone(),
            },
        );
        Ok(())
    }

    /// Removes a freshly inserted project and the statuses stored with it.
    fn discard_project(&mut self, project_id: ProjectId, statuses: &[Status]) {
        for status in statuses {
            self.statuses.remove(&status.id());
        }
        self.projects.remove(&project_id);
    }
}

#[async_trait]
impl ProjectRepository for InMemoryTrackerStore {
    async fn store_project(&self, project: &Project) -> TrackerRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.insert_project(project)
    }

    async fn store_project_with_workflow(
        &self,
        project: &Project,
        statuses: &[Status],
    ) -> TrackerRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.insert_project(project)?;
        for (stored, status) in statuses.iter().enumerate() {
            if let Err(err) = state.insert_status(status) {
                // The guard is still held, so no reader saw these rows.
                state.discard_project(project.id(), statuses.get(..stored).unwrap_or_default());
                return Err(err);
            }
        }
        Ok(())
    }

    async fn update_project(&self, project: &Project) -> TrackerRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if replace(&mut state.projects, &project.id(), project.clone()) {
            Ok(())
        } else {
            Err(TrackerRepositoryError::ProjectNotFound(project.id()))
        }
    }

    async fn find_project(&self, id: ProjectId) -> TrackerRepositoryResult<Option<Project>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.projects.get(&id).map(|entry| entry.value.clone()))
    }

    async fn list_projects(&self) -> TrackerRepositoryResult<Vec<Project>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(in_insertion_order(state.projects.values()))
    }

    async fn delete_project(&self, id: ProjectId) -> TrackerRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.projects.remove(&id).is_none() {
            return Err(TrackerRepositoryError::ProjectNotFound(id));
        }
        state.tasks.retain(|_, entry| entry.value.project_id() != id);
        state
            .statuses
            .retain(|_, entry| entry.value.project_id() != id);
        state.sprints.retain(|_, entry| entry.value.project_id() != id);
        Ok(())
    }
}
