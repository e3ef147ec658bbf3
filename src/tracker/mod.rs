//! Project, sprint, status and task tracking.
//!
//! The tracker owns the ordered status workflow of every project and the
//! tasks that move through it. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`], including the pure ordering rules in
//!   [`domain::StatusOrder`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//!
//! Status ordering is scoped to a project and expressed through an explicit
//! per-project rank. Reordering two statuses exchanges their ranks; names and
//! identities stay with their rows.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
