//! Step definitions for status workflow BDD scenarios.

mod given;
mod then;
mod when;
pub mod world;
