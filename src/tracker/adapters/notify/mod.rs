//! Notifier adapters.
//!
//! Neither adapter talks to a mail server: [`RecordingNotifier`] keeps
//! messages in memory for assertions and [`TracingNotifier`] writes them to
//! the log.

mod recording;
mod tracing_log;

pub use recording::RecordingNotifier;
pub use tracing_log::TracingNotifier;
