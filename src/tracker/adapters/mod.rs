//! Adapter implementations for tracker ports.

pub mod memory;
pub mod notify;
pub mod postgres;
