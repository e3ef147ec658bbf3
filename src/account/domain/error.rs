//! Error types for account validation.

use thiserror::Error;

/// Errors returned while constructing account values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountDomainError {
    /// The username is empty after trimming.
    #[error("username must not be empty")]
    EmptyUsername,

    /// The username exceeds the storage limit.
    #[error("username exceeds {max} characters")]
    UsernameTooLong {
        /// Maximum permitted length in characters.
        max: usize,
    },

    /// The username contains whitespace.
    #[error("username '{0}' must not contain whitespace")]
    UsernameWhitespace(String),

    /// The e-mail address is malformed.
    #[error("invalid e-mail address '{0}'")]
    InvalidEmail(String),
}
