//! Zira: project and task tracking.
//!
//! Users create projects, plan sprints, assign tasks to workers and move
//! those tasks through each project's ordered status workflow.
//!
//! # Architecture
//!
//! Zira follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence and notification
//! - **Adapters**: In-memory and `PostgreSQL` implementations of ports
//! - **Services**: Orchestration over ports, including the status sequencer
//!
//! # Modules
//!
//! - [`account`]: Users that author, edit and work on tasks
//! - [`tracker`]: Projects, sprints, statuses, tasks and workflow moves
//! - [`config`]: TOML configuration
//! - [`telemetry`]: Structured logging setup

pub mod account;
pub mod config;
pub mod telemetry;
pub mod tracker;
