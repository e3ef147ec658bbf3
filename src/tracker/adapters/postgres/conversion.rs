//! Conversions between tracker aggregates and Diesel rows.
//!
//! Rows read back from the database are validated again on the way in, so
//! a hand-edited row that breaks a domain rule surfaces as a persistence
//! error instead of an invalid aggregate.

use super::models::{ProjectRow, SprintRow, StatusRow, TaskRow};
use crate::account::domain::UserId;
use crate::tracker::{
    domain::{
        Completion, EntityKind, ItemName, PersistedProjectData, PersistedSprintData,
        PersistedStatusData, PersistedTaskData, Project, ProjectId, Sprint, SprintId, Status,
        StatusId, StatusRank, Task, TaskId,
    },
    ports::{TrackerRepositoryError, TrackerRepositoryResult},
};

fn user_id(id: Option<uuid::Uuid>) -> Option<UserId> {
    id.map(UserId::from_uuid)
}

fn raw_user_id(id: Option<UserId>) -> Option<uuid::Uuid> {
    id.map(UserId::into_inner)
}

fn parse_name(kind: EntityKind, name: String) -> TrackerRepositoryResult<ItemName> {
    ItemName::new(kind, name).map_err(TrackerRepositoryError::persistence)
}

pub(super) fn project_to_row(project: &Project) -> ProjectRow {
    ProjectRow {
        id: project.id().into_inner(),
        name: project.name().as_str().to_owned(),
        description: project.description().map(str::to_owned),
        author_id: raw_user_id(project.author()),
        last_editor_id: raw_user_id(project.last_editor()),
        finish_by: project.finish_by(),
        completed_at: project.completion().completed_at(),
        created_at: project.created_at(),
        updated_at: project.updated_at(),
    }
}

pub(super) fn row_to_project(row: ProjectRow) -> TrackerRepositoryResult<Project> {
    Ok(Project::from_persisted(PersistedProjectData {
        id: ProjectId::from_uuid(row.id),
        name: parse_name(EntityKind::Project, row.name)?,
        description: row.description,
        author: user_id(row.author_id),
        last_editor: user_id(row.last_editor_id),
        finish_by: row.finish_by,
        completion: Completion::from_timestamp(row.completed_at),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

pub(super) fn sprint_to_row(sprint: &Sprint) -> SprintRow {
    SprintRow {
        id: sprint.id().into_inner(),
        project_id: sprint.project_id().into_inner(),
        name: sprint.name().as_str().to_owned(),
        description: sprint.description().map(str::to_owned),
        author_id: raw_user_id(sprint.author()),
        last_editor_id: raw_user_id(sprint.last_editor()),
        finish_by: sprint.finish_by(),
        completed_at: sprint.completion().completed_at(),
        created_at: sprint.created_at(),
        updated_at: sprint.updated_at(),
    }
}

pub(super) fn row_to_sprint(row: SprintRow) -> TrackerRepositoryResult<Sprint> {
    Ok(Sprint::from_persisted(PersistedSprintData {
        id: SprintId::from_uuid(row.id),
        project_id: ProjectId::from_uuid(row.project_id),
        name: parse_name(EntityKind::Sprint, row.name)?,
        description: row.description,
        author: user_id(row.author_id),
        last_editor: user_id(row.last_editor_id),
        finish_by: row.finish_by,
        completion: Completion::from_timestamp(row.completed_at),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

pub(super) fn rank_to_column(rank: StatusRank) -> TrackerRepositoryResult<i32> {
    i32::try_from(rank.value()).map_err(TrackerRepositoryError::persistence)
}

fn column_to_rank(rank: i32) -> TrackerRepositoryResult<StatusRank> {
    let value = u32::try_from(rank).map_err(TrackerRepositoryError::persistence)?;
    StatusRank::new(value).map_err(TrackerRepositoryError::persistence)
}

pub(super) fn status_to_row(status: &Status) -> TrackerRepositoryResult<StatusRow> {
    Ok(StatusRow {
        id: status.id().into_inner(),
        project_id: status.project_id().into_inner(),
        name: status.name().as_str().to_owned(),
        rank: rank_to_column(status.rank())?,
        author_id: raw_user_id(status.author()),
        created_at: status.created_at(),
        updated_at: status.updated_at(),
    })
}

pub(super) fn row_to_status(row: StatusRow) -> TrackerRepositoryResult<Status> {
    Ok(Status::from_persisted(PersistedStatusData {
        id: StatusId::from_uuid(row.id),
        project_id: ProjectId::from_uuid(row.project_id),
        name: parse_name(EntityKind::Status, row.name)?,
        rank: column_to_rank(row.rank)?,
        author: user_id(row.author_id),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

pub(super) fn task_to_row(task: &Task) -> TaskRow {
    TaskRow {
        id: task.id().into_inner(),
        project_id: task.project_id().into_inner(),
        sprint_id: task.sprint_id().map(SprintId::into_inner),
        status_id: task.status_id().map(StatusId::into_inner),
        name: task.name().as_str().to_owned(),
        description: task.description().map(str::to_owned),
        author_id: raw_user_id(task.author()),
        worker_id: raw_user_id(task.worker()),
        last_editor_id: raw_user_id(task.last_editor()),
        finish_by: task.finish_by(),
        completed_at: task.completion().completed_at(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

pub(super) fn row_to_task(row: TaskRow) -> TrackerRepositoryResult<Task> {
    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        project_id: ProjectId::from_uuid(row.project_id),
        sprint_id: row.sprint_id.map(SprintId::from_uuid),
        status_id: row.status_id.map(StatusId::from_uuid),
        name: parse_name(EntityKind::Task, row.name)?,
        description: row.description,
        author: user_id(row.author_id),
        worker: user_id(row.worker_id),
        last_editor: user_id(row.last_editor_id),
        finish_by: row.finish_by,
        completion: Completion::from_timestamp(row.completed_at),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
