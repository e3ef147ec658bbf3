use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use super::{
    conversion::{row_to_status, status_to_row},
    locks::{lock_project, lock_status_order, project_of_status},
    models::StatusRow,
    repository::{PostgresTrackerStore, STATUS_RANK_CONSTRAINT, violated_constraint},
    schema::statuses,
};
use crate::tracker::{
    domain::{EntityKind, ProjectId, Status, StatusId, StatusOrder, StatusRank},
    ports::{StatusRepository, TrackerRepositoryError, TrackerRepositoryResult},
};

/// Loads a project's statuses as an ordered workflow.
fn load_status_order(
    connection: &mut PgConnection,
    project_id: ProjectId,
) -> TrackerRepositoryResult<StatusOrder> {
    let statuses = statuses::table
        .filter(statuses::project_id.eq(project_id.into_inner()))
        .select(StatusRow::as_select())
        .load::<StatusRow>(connection)?
        .into_iter()
        .map(row_to_status)
        .collect::<TrackerRepositoryResult<Vec<_>>>()?;
    Ok(StatusOrder::new(project_id, statuses))
}

fn insert_error(
    err: DieselError,
    id: StatusId,
    project_id: ProjectId,
    rank: StatusRank,
) -> TrackerRepositoryError {
    if let Some(constraint) = violated_constraint(&err, DatabaseErrorKind::UniqueViolation) {
        return if constraint == STATUS_RANK_CONSTRAINT {
            TrackerRepositoryError::DuplicateStatusRank { project_id, rank }
        } else {
            TrackerRepositoryError::Duplicate(EntityKind::Status, id.into_inner())
        };
    }
    if violated_constraint(&err, DatabaseErrorKind::ForeignKeyViolation)
        .is_some_and(|constraint| constraint == "statuses_project_id_fkey")
    {
        return TrackerRepositoryError::ProjectNotFound(project_id);
    }
    TrackerRepositoryError::persistence(err)
}

/// Inserts a status row, mapping constraint violations to domain errors.
pub(super) fn insert_status(
    connection: &mut PgConnection,
    status: &Status,
) -> TrackerRepositoryResult<()> {
    let row = status_to_row(status)?;
    diesel::insert_into(statuses::table)
        .values(&row)
        .execute(connection)
        .map_err(|err| insert_error(err, status.id(), status.project_id(), status.rank()))?;
    Ok(())
}

fn append_in_transaction(
    connection: &mut PgConnection,
    mut status: Status,
) -> TrackerRepositoryResult<Status> {
    lock_project(connection, status.project_id())?;
    let rank = load_status_order(connection, status.project_id())?.next_rank()?;
    status.place_at(rank);
    insert_status(connection, &status)?;
    Ok(status)
}

fn delete_in_transaction(
    connection: &mut PgConnection,
    id: StatusId,
) -> TrackerRepositoryResult<()> {
    let project_id = project_of_status(connection, id)?;
    lock_status_order(connection, project_id)?;
    // Tasks keep existing with `status_id = NULL` via `ON DELETE SET NULL`.
    let deleted = diesel::delete(statuses::table.find(id.into_inner())).execute(connection)?;
    if deleted == 0 {
        return Err(TrackerRepositoryError::StatusNotFound(id));
    }
    Ok(())
}

#[async_trait]
impl StatusRepository for PostgresTrackerStore {
    async fn store_status(&self, status: &Status) -> TrackerRepositoryResult<()> {
        let pending = status.clone();
        self.run_blocking(move |connection| insert_status(connection, &pending))
            .await
    }

    async fn append_status(&self, status: &Status) -> TrackerRepositoryResult<Status> {
        let pending = status.clone();
        self.run_blocking(move |connection| {
            connection.transaction(|transaction| append_in_transaction(transaction, pending))
        })
        .await
    }

    async fn rename_status(&self, status: &Status) -> TrackerRepositoryResult<()> {
        let id = status.id();
        let name = status.name().as_str().to_owned();
        let updated_at = status.updated_at();
        self.run_blocking(move |connection| {
            let updated = diesel::update(statuses::table.find(id.into_inner()))
                .set((statuses::name.eq(&name), statuses::updated_at.eq(updated_at)))
                .execute(connection)?;
            if updated == 0 {
                return Err(TrackerRepositoryError::StatusNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_status(&self, id: StatusId) -> TrackerRepositoryResult<Option<Status>> {
        self.run_blocking(move |connection| {
            let row = statuses::table
                .find(id.into_inner())
                .select(StatusRow::as_select())
                .first::<StatusRow>(connection)
                .optional()?;
            row.map(row_to_status).transpose()
        })
        .await
    }

    async fn status_order(&self, project_id: ProjectId) -> TrackerRepositoryResult<StatusOrder> {
        self.run_blocking(move |connection| load_status_order(connection, project_id))
            .await
    }

    async fn delete_status(&self, id: StatusId) -> TrackerRepositoryResult<()> {
        self.run_blocking(move |connection| {
            connection.transaction(|transaction| delete_in_transaction(transaction, id))
        })
        .await
    }
}
