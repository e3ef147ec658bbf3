//! `PostgreSQL` tracker store: pool handling and error mapping shared by the
//! per-port implementations.

use crate::tracker::ports::{TrackerRepositoryError, TrackerRepositoryResult};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by the tracker store.
pub type TrackerPgPool = Pool<ConnectionManager<PgConnection>>;

/// Unique index on `(project_id, rank)` of the `statuses` table.
pub(super) const STATUS_RANK_CONSTRAINT: &str = "statuses_project_rank_unique";

/// `PostgreSQL`-backed implementation of every tracker repository port.
#[derive(Debug, Clone)]
pub struct PostgresTrackerStore {
    pool: TrackerPgPool,
}

impl PostgresTrackerStore {
    /// Creates a store from a connection pool.
    #[must_use]
    pub const fn new(pool: TrackerPgPool) -> Self {
        Self { pool }
    }

    pub(super) async fn run_blocking<F, T>(&self, f: F) -> TrackerRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TrackerRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TrackerRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TrackerRepositoryError::persistence)?
    }
}

/// Lets `?` and `Connection::transaction` lift raw Diesel failures.
///
/// Failures with a domain meaning (unique and foreign-key violations, missing
/// rows) are mapped explicitly at the call site before this applies.
impl From<DieselError> for TrackerRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

/// Returns the violated constraint when `err` is a database error of `kind`.
pub(super) fn violated_constraint(err: &DieselError, kind: DatabaseErrorKind) -> Option<String> {
    match err {
        DieselError::DatabaseError(actual, info) if same_kind(actual, &kind) => {
            Some(constraint_of(info.as_ref()))
        }
        _ => None,
    }
}

fn same_kind(actual: &DatabaseErrorKind, expected: &DatabaseErrorKind) -> bool {
    std::mem::discriminant(actual) == std::mem::discriminant(expected)
}

fn constraint_of(info: &dyn DatabaseErrorInformation) -> String {
    info.constraint_name().unwrap_or_default().to_owned()
}
