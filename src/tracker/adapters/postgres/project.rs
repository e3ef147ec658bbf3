use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;

use super::{
    conversion::{project_to_row, row_to_project},
    models::ProjectRow,
    repository::{PostgresTrackerStore, violated_constraint},
    schema::projects,
    status::insert_status,
};
use crate::tracker::{
    domain::{EntityKind, Project, ProjectId, Status},
    ports::{ProjectRepository, TrackerRepositoryError, TrackerRepositoryResult},
};

fn insert_project(
    connection: &mut PgConnection,
    row: &ProjectRow,
) -> TrackerRepositoryResult<()> {
    diesel::insert_into(projects::table)
        .values(row)
        .execute(connection)
        .map_err(|err| {
            if violated_constraint(&err, DatabaseErrorKind::UniqueViolation).is_some() {
                TrackerRepositoryError::Duplicate(EntityKind::Project, row.id)
            } else {
                TrackerRepositoryError::persistence(err)
            }
        })?;
    Ok(())
}

#[async_trait]
impl ProjectRepository for PostgresTrackerStore {
    async fn store_project(&self, project: &Project) -> TrackerRepositoryResult<()> {
        let row = project_to_row(project);
        self.run_blocking(move |connection| insert_project(connection, &row))
            .await
    }

    async fn store_project_with_workflow(
        &self,
        project: &Project,
        statuses: &[Status],
    ) -> TrackerRepositoryResult<()> {
        let row = project_to_row(project);
        let workflow = statuses.to_vec();
        self.run_blocking(move |connection| {
            connection.transaction(|transaction| {
                insert_project(transaction, &row)?;
                workflow
                    .iter()
                    .try_for_each(|status| insert_status(transaction, status))
            })
        })
        .await
    }

    async fn update_project(&self, project: &Project) -> TrackerRepositoryResult<()> {
        let id = project.id();
        let row = project_to_row(project);
        self.run_blocking(move |connection| {
            let updated = diesel::update(projects::table.find(id.into_inner()))
                .set(&row)
                .execute(connection)?;
            if updated == 0 {
                return Err(TrackerRepositoryError::ProjectNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_project(&self, id: ProjectId) -> TrackerRepositoryResult<Option<Project>> {
        self.run_blocking(move |connection| {
            let row = projects::table
                .find(id.into_inner())
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()?;
            row.map(row_to_project).transpose()
        })
        .await
    }

    async fn list_projects(&self) -> TrackerRepositoryResult<Vec<Project>> {
        self.run_blocking(move |connection| {
            projects::table
                .order((projects::created_at.asc(), projects::id.asc()))
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)?
                .into_iter()
                .map(row_to_project)
                .collect()
        })
        .await
    }

    async fn delete_project(&self, id: ProjectId) -> TrackerRepositoryResult<()> {
        // Sprints, statuses and tasks go with the project through
        // `ON DELETE CASCADE`.
        self.run_blocking(move |connection| {
            let deleted =
                diesel::delete(projects::table.find(id.into_inner())).execute(connection)?;
            if deleted == 0 {
                return Err(TrackerRepositoryError::ProjectNotFound(id));
            }
            Ok(())
        })
        .await
    }
}
