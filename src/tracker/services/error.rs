//! Error type shared by the tracker CRUD services.

use crate::tracker::{domain::TrackerDomainError, ports::TrackerRepositoryError};
use thiserror::Error;

/// Service-level errors for tracker operations.
#[derive(Debug, Clone, Error)]
pub enum TrackerServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TrackerDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TrackerRepositoryError),
}

impl TrackerServiceError {
    /// Returns `true` when a referenced entity does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Repository(err) if err.is_not_found())
    }
}

/// Result type for tracker service operations.
pub type TrackerServiceResult<T> = Result<T, TrackerServiceError>;
