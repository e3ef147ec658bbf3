//! User accounts known to the tracker.
//!
//! Accounts identify task authors, editors and workers, and supply the
//! contact address used for task notifications. Registration and login
//! screens live outside this crate; the directory only stores and resolves
//! users.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
