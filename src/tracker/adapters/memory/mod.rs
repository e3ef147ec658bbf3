//! In-memory tracker store for tests and local runs.
//!
//! One [`RwLock`] guards every table. Every read-modify-write (workflow
//! moves in [`workflow`], task edits, status appends and project seeding)
//! runs under a single write guard.

mod project;
mod sprint;
mod status;
mod task;
mod workflow;

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

use crate::tracker::{
    domain::{
        Project, ProjectId, Sprint, SprintId, Status, StatusId, StatusOrder, Task, TaskId,
    },
    ports::{TrackerRepositoryError, TrackerRepositoryResult},
};

/// Thread-safe in-memory implementation of every tracker repository port.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTrackerStore {
    state: Arc<RwLock<TrackerState>>,
}

impl InMemoryTrackerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// A row plus its insertion sequence, used for creation-order listings.
#[derive(Debug, Clone)]
struct Stored<T> {
    sequence: u64,
    value: T,
}

#[derive(Debug, Default)]
struct TrackerState {
    next_sequence: u64,
    projects: HashMap<ProjectId, Stored<Project>>,
    sprints: HashMap<SprintId, Stored<Sprint>>,
    statuses: HashMap<StatusId, Stored<Status>>,
    tasks: HashMap<TaskId, Stored<Task>>,
}

impl TrackerState {
    fn take_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.saturating_add(1);
        sequence
    }

    fn status_order(&self, project_id: ProjectId) -> StatusOrder {
        let statuses = self
            .statuses
            .values()
            .filter(|entry| entry.value.project_id() == project_id)
            .map(|entry| entry.value.clone())
            .collect();
        StatusOrder::new(project_id, statuses)
    }

    /// Rejects a task whose project, sprint or status does not exist.
    fn check_task_links(&self, task: &Task) -> TrackerRepositoryResult<()> {
        if !self.projects.contains_key(&task.project_id()) {
            return Err(TrackerRepositoryError::ProjectNotFound(task.project_id()));
        }
        if let Some(sprint_id) = task.sprint_id()
            && !self.sprints.contains_key(&sprint_id)
        {
            return Err(TrackerRepositoryError::SprintNotFound(sprint_id));
        }
        if let Some(status_id) = task.status_id()
            && !self.statuses.contains_key(&status_id)
        {
            return Err(TrackerRepositoryError::StatusNotFound(status_id));
        }
        Ok(())
    }
}

fn poisoned(err: impl std::fmt::Display) -> TrackerRepositoryError {
    TrackerRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Clones the selected rows in insertion order.
fn in_insertion_order<'a, T: Clone + 'a>(entries: impl Iterator<Item = &'a Stored<T>>) -> Vec<T> {
    let mut selected: Vec<&Stored<T>> = entries.collect();
    selected.sort_by_key(|entry| entry.sequence);
    selected
        .into_iter()
        .map(|entry| entry.value.clone())
        .collect()
}

/// Overwrites an existing row, keeping its insertion sequence.
///
/// Returns `false` when no row exists under `key`.
fn replace<K: Eq + Hash, T>(table: &mut HashMap<K, Stored<T>>, key: &K, value: T) -> bool {
    table.get_mut(key).is_some_and(|entry| {
        entry.value = value;
        true
    })
}
