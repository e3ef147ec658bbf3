use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::expression_methods::PgTextExpressionMethods;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use super::{
    conversion::{row_to_task, task_to_row},
    locks::{lock_status_order, lock_task, project_of_task},
    models::TaskRow,
    repository::{PostgresTrackerStore, violated_constraint},
    schema::tasks,
};
use crate::account::domain::UserId;
use crate::tracker::{
    domain::{
        EntityKind, ProjectId, SprintId, StatusId, Task, TaskEdit, TaskFilter, TaskId,
        TaskRevision,
    },
    ports::{TaskRepository, TrackerRepositoryError, TrackerRepositoryResult},
};

const TASK_PROJECT_CONSTRAINT: &str = "tasks_project_id_fkey";
const TASK_SPRINT_CONSTRAINT: &str = "tasks_sprint_id_fkey";
const TASK_STATUS_CONSTRAINT: &str = "tasks_status_id_fkey";

/// Maps a foreign-key violation on a task row to the missing reference.
fn missing_reference(err: DieselError, task: &TaskRow) -> TrackerRepositoryError {
    let constraint = violated_constraint(&err, DatabaseErrorKind::ForeignKeyViolation);
    match (constraint.as_deref(), task.sprint_id, task.status_id) {
        (Some(TASK_SPRINT_CONSTRAINT), Some(sprint_id), _) => {
            TrackerRepositoryError::SprintNotFound(SprintId::from_uuid(sprint_id))
        }
        (Some(TASK_STATUS_CONSTRAINT), _, Some(status_id)) => {
            TrackerRepositoryError::StatusNotFound(StatusId::from_uuid(status_id))
        }
        (Some(TASK_PROJECT_CONSTRAINT), _, _) => {
            TrackerRepositoryError::ProjectNotFound(ProjectId::from_uuid(task.project_id))
        }
        _ => TrackerRepositoryError::persistence(err),
    }
}

fn edit_in_transaction(
    connection: &mut PgConnection,
    id: TaskId,
    edit: TaskEdit,
    editor: Option<UserId>,
    at: DateTime<Utc>,
) -> TrackerRepositoryResult<TaskRevision> {
    // Statuses before the task row, as in the workflow moves.
    let project_id = project_of_task(connection, id)?;
    lock_status_order(connection, project_id)?;
    let before = lock_task(connection, id)?;

    let mut after = before.clone();
    after.apply_at(edit, editor, at);
    let row = task_to_row(&after);
    diesel::update(tasks::table.find(id.into_inner()))
        .set(&row)
        .execute(connection)
        .map_err(|err| missing_reference(err, &row))?;
    Ok(TaskRevision { before, after })
}

/// Escapes `LIKE` wildcards so a fragment matches literally.
fn like_pattern(fragment: &str) -> String {
    let escaped = fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl TaskRepository for PostgresTrackerStore {
    async fn store_task(&self, task: &Task) -> TrackerRepositoryResult<()> {
        let id = task.id();
        let row = task_to_row(task);
        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| {
                    if violated_constraint(&err, DatabaseErrorKind::UniqueViolation).is_some() {
                        TrackerRepositoryError::Duplicate(EntityKind::Task, id.into_inner())
                    } else {
                        missing_reference(err, &row)
                    }
                })?;
            Ok(())
        })
        .await
    }

    async fn apply_task_edit(
        &self,
        id: TaskId,
        edit: TaskEdit,
        editor: Option<UserId>,
        at: DateTime<Utc>,
    ) -> TrackerRepositoryResult<TaskRevision> {
        self.run_blocking(move |connection| {
            connection.transaction(|transaction| {
                edit_in_transaction(transaction, id, edit, editor, at)
            })
        })
        .await
    }

    async fn find_task(&self, id: TaskId) -> TrackerRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> TrackerRepositoryResult<Vec<Task>> {
        let criteria = filter.clone();
        self.run_blocking(move |connection| {
            let mut query = tasks::table.select(TaskRow::as_select()).into_boxed();
            if let Some(project_id) = criteria.project_id() {
                query = query.filter(tasks::project_id.eq(project_id.into_inner()));
            }
            if let Some(sprint_id) = criteria.sprint_id() {
                query = query.filter(tasks::sprint_id.eq(sprint_id.into_inner()));
            }
            if let Some(worker) = criteria.worker() {
                query = query.filter(tasks::worker_id.eq(worker.into_inner()));
            }
            if let Some(fragment) = criteria.name_fragment() {
                query = query.filter(tasks::name.ilike(like_pattern(fragment)));
            }
            query = match criteria.completion() {
                Some(true) => query.filter(tasks::completed_at.is_not_null()),
                Some(false) => query.filter(tasks::completed_at.is_null()),
                None => query,
            };
            query
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .load::<TaskRow>(connection)?
                .into_iter()
                .map(row_to_task)
                .collect()
        })
        .await
    }

    async fn delete_task(&self, id: TaskId) -> TrackerRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.find(id.into_inner())).execute(connection)?;
            if deleted == 0 {
                return Err(TrackerRepositoryError::TaskNotFound(id));
            }
            Ok(())
        })
        .await
    }
}
