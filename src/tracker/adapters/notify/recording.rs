//! Notifier that records every message it is asked to send.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};

use crate::tracker::ports::{Notifier, NotifierError, OutgoingMessage};

/// In-memory notifier for tests.
///
/// A failing recorder still records each attempt before rejecting it, so
/// tests can assert both that delivery was tried and that the failure did
/// not escape.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<OutgoingMessage>>>,
    failure: Option<String>,
}

impl RecordingNotifier {
    /// Creates a recorder that accepts every message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recorder that rejects every message with `reason`.
    #[must_use]
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            sent: Arc::default(),
            failure: Some(reason.into()),
        }
    }

    /// Returns every message passed to [`Notifier::send`], in call order.
    #[must_use]
    pub fn messages(&self) -> Vec<OutgoingMessage> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &OutgoingMessage) -> Result<(), NotifierError> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.clone());
        match &self.failure {
            Some(reason) => Err(NotifierError::Rejected {
                recipient: message.to.clone(),
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}
