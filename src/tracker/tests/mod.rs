//! Unit tests for the tracker context.

mod notification_tests;
mod support;
