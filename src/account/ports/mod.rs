//! Port contracts for the account directory.

pub mod directory;

pub use directory::{UserDirectory, UserDirectoryError, UserDirectoryResult};
