//! Outbound notification port.

use crate::account::domain::EmailAddress;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// A rendered message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    /// Sender address.
    pub from: EmailAddress,
    /// Recipient address.
    pub to: EmailAddress,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Best-effort message delivery.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers one message.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError`] when delivery fails. Callers treat delivery
    /// as best-effort and do not propagate the error.
    async fn send(&self, message: &OutgoingMessage) -> Result<(), NotifierError>;
}

/// Errors returned by notifier implementations.
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    /// The transport refused the message.
    #[error("message to {recipient} rejected: {reason}")]
    Rejected {
        /// Intended recipient.
        recipient: EmailAddress,
        /// Transport-provided reason.
        reason: String,
    },

    /// The transport failed.
    #[error("notification transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotifierError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
