//! Notifier that writes outgoing messages to the log.

use async_trait::async_trait;
use tracing::info;

use crate::tracker::ports::{Notifier, NotifierError, OutgoingMessage};

/// Development stand-in for mail delivery.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    /// Creates the notifier.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for TracingNotifier {
    async fn send(&self, message: &OutgoingMessage) -> Result<(), NotifierError> {
        info!(
            from = %message.from,
            to = %message.to,
            subject = %message.subject,
            body = %message.body,
            "notification sent"
        );
        Ok(())
    }
}
