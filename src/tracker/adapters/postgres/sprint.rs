use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;

use super::{
    conversion::{row_to_sprint, sprint_to_row},
    models::SprintRow,
    repository::{PostgresTrackerStore, violated_constraint},
    schema::sprints,
};
use crate::tracker::{
    domain::{EntityKind, ProjectId, Sprint, SprintId},
    ports::{SprintRepository, TrackerRepositoryError, TrackerRepositoryResult},
};

#[async_trait]
impl SprintRepository for PostgresTrackerStore {
    async fn store_sprint(&self, sprint: &Sprint) -> TrackerRepositoryResult<()> {
        let id = sprint.id();
        let project_id = sprint.project_id();
        let row = sprint_to_row(sprint);
        self.run_blocking(move |connection| {
            diesel::insert_into(sprints::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| {
                    if violated_constraint(&err, DatabaseErrorKind::UniqueViolation).is_some() {
                        TrackerRepositoryError::Duplicate(EntityKind::Sprint, id.into_inner())
                    } else if violated_constraint(&err, DatabaseErrorKind::ForeignKeyViolation)
                        .is_some_and(|constraint| constraint == "sprints_project_id_fkey")
                    {
                        TrackerRepositoryError::ProjectNotFound(project_id)
                    } else {
                        TrackerRepositoryError::persistence(err)
                    }
                })?;
            Ok(())
        })
        .await
    }

    async fn update_sprint(&self, sprint: &Sprint) -> TrackerRepositoryResult<()> {
        let id = sprint.id();
        let row = sprint_to_row(sprint);
        self.run_blocking(move |connection| {
            let updated = diesel::update(sprints::table.find(id.into_inner()))
                .set(&row)
                .execute(connection)?;
            if updated == 0 {
                return Err(TrackerRepositoryError::SprintNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_sprint(&self, id: SprintId) -> TrackerRepositoryResult<Option<Sprint>> {
        self.run_blocking(move |connection| {
            let row = sprints::table
                .find(id.into_inner())
                .select(SprintRow::as_select())
                .first::<SprintRow>(connection)
                .optional()?;
            row.map(row_to_sprint).transpose()
        })
        .await
    }

    async fn list_sprints(&self, project_id: ProjectId) -> TrackerRepositoryResult<Vec<Sprint>> {
        self.run_blocking(move |connection| {
            sprints::table
                .filter(sprints::project_id.eq(project_id.into_inner()))
                .order((sprints::created_at.asc(), sprints::id.asc()))
                .select(SprintRow::as_select())
                .load::<SprintRow>(connection)?
                .into_iter()
                .map(row_to_sprint)
                .collect()
        })
        .await
    }

    async fn delete_sprint(&self, id: SprintId) -> TrackerRepositoryResult<()> {
        // Tasks keep existing with `sprint_id = NULL` via `ON DELETE SET NULL`.
        self.run_blocking(move |connection| {
            let deleted =
                diesel::delete(sprints::table.find(id.into_inner())).execute(connection)?;
            if deleted == 0 {
                return Err(TrackerRepositoryError::SprintNotFound(id));
            }
            Ok(())
        })
        .await
    }
}
