//! `PostgreSQL` adapter for the tracker ports.
//!
//! Tables are created by the SQL migrations under `migrations/`. The store
//! relies on their foreign keys for delete cascades and on the deferred
//! `(project_id, rank)` unique constraint for status swaps.

mod conversion;
mod locks;
mod models;
mod project;
mod repository;
mod schema;
mod sprint;
mod status;
mod task;
mod workflow;

pub use repository::{PostgresTrackerStore, TrackerPgPool};
