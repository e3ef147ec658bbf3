//! Domain model for user accounts.

mod error;
mod ids;
mod user;

pub use error::AccountDomainError;
pub use ids::UserId;
pub use user::{EmailAddress, PersistedUserData, User, Username};
