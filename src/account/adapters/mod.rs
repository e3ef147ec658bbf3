//! Adapter implementations for the account directory.

pub mod memory;
pub mod postgres;
