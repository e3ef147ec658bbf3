//! Best-effort task notifications.
//!
//! The decision of *whether* to notify is made by
//! [`TaskNotice::from_change`]; this service resolves the people and status
//! names the notice refers to, renders the message and hands it to the
//! [`Notifier`]. Every failure is logged and swallowed by
//! [`TaskNotificationService::dispatch`], so a notification can never undo
//! or fail the task change that triggered it.

use crate::account::{
    domain::{EmailAddress, User, UserId, Username},
    ports::{UserDirectory, UserDirectoryError},
};
use crate::tracker::{
    domain::{StatusId, TaskId, TaskNotice, TaskNoticeKind},
    ports::{Notifier, NotifierError, OutgoingMessage, StatusRepository, TrackerRepositoryError},
};
use minijinja::Environment;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Label rendered for a missing status.
const NO_STATUS_LABEL: &str = "none";

/// Subject and body templates for both notification kinds.
///
/// Templates are `minijinja` source strings rendered with the variables
/// `recipient`, `editor`, `editor_email`, `task`, `old_status` and
/// `new_status`. The status variables are empty for assignment notices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationTemplates {
    /// Subject of the message sent to a newly assigned worker.
    pub assigned_subject: String,
    /// Body of the message sent to a newly assigned worker.
    pub assigned_body: String,
    /// Subject of the message sent when a task changes status.
    pub status_changed_subject: String,
    /// Body of the message sent when a task changes status.
    pub status_changed_body: String,
}

impl Default for NotificationTemplates {
    fn default() -> Self {
        Self {
            assigned_subject: "Task assigned to you".to_owned(),
            assigned_body: concat!(
                "{{ recipient }}, hello! ",
                "User {{ editor }} ({{ editor_email }}) assigned you the task ",
                "'{{ task }}'. Please take a look."
            )
            .to_owned(),
            status_changed_subject: "Task status changed".to_owned(),
            status_changed_body: concat!(
                "{{ recipient }}, hello! ",
                "User {{ editor }} ({{ editor_email }}) changed the status of task ",
                "'{{ task }}' from '{{ old_status }}' to '{{ new_status }}'. ",
                "Please take a look."
            )
            .to_owned(),
        }
    }
}

/// Sender address and templates used for task notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationSettings {
    enabled: bool,
    sender: EmailAddress,
    templates: NotificationTemplates,
}

impl NotificationSettings {
    /// Creates enabled settings with the default templates.
    #[must_use]
    pub fn new(sender: EmailAddress) -> Self {
        Self {
            enabled: true,
            sender,
            templates: NotificationTemplates::default(),
        }
    }

    /// Turns delivery on or off.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Replaces the templates.
    #[must_use]
    pub fn with_templates(mut self, templates: NotificationTemplates) -> Self {
        self.templates = templates;
        self
    }

    /// Returns `true` when notifications are delivered.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the sender address.
    #[must_use]
    pub const fn sender(&self) -> &EmailAddress {
        &self.sender
    }

    /// Returns the templates.
    #[must_use]
    pub const fn templates(&self) -> &NotificationTemplates {
        &self.templates
    }
}

/// Reasons a notification was not delivered.
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    /// The task has no worker to notify.
    #[error("task {0} has no worker to notify")]
    NoRecipient(TaskId),

    /// The change was made without a known acting user.
    #[error("task {0} was changed without an acting user")]
    NoEditor(TaskId),

    /// A referenced user is not in the directory.
    #[error("user not found: {0}")]
    UnknownUser(UserId),

    /// The recipient has no e-mail address.
    #[error("user {0} has no e-mail address")]
    MissingEmail(Username),

    /// User lookup failed.
    #[error(transparent)]
    Directory(#[from] UserDirectoryError),

    /// Status lookup failed.
    #[error(transparent)]
    Status(#[from] TrackerRepositoryError),

    /// A template failed to render.
    #[error("failed to render notification template: {0}")]
    Render(String),

    /// The notifier refused or failed to deliver the message.
    #[error(transparent)]
    Delivery(#[from] NotifierError),
}

/// Resolves, renders and sends task notifications.
pub struct TaskNotificationService<R, D, N>
where
    R: StatusRepository,
    D: UserDirectory,
    N: Notifier,
{
    statuses: Arc<R>,
    directory: Arc<D>,
    notifier: Arc<N>,
    settings: NotificationSettings,
}

impl<R, D, N> Clone for TaskNotificationService<R, D, N>
where
    R: StatusRepository,
    D: UserDirectory,
    N: Notifier,
{
    fn clone(&self) -> Self {
        Self {
            statuses: Arc::clone(&self.statuses),
            directory: Arc::clone(&self.directory),
            notifier: Arc::clone(&self.notifier),
            settings: self.settings.clone(),
        }
    }
}

impl<R, D, N> TaskNotificationService<R, D, N>
where
    R: StatusRepository,
    D: UserDirectory,
    N: Notifier,
{
    /// Creates a new notification service.
    #[must_use]
    pub const fn new(
        statuses: Arc<R>,
        directory: Arc<D>,
        notifier: Arc<N>,
        settings: NotificationSettings,
    ) -> Self {
        Self {
            statuses,
            directory,
            notifier,
            settings,
        }
    }

    /// Sends the notification for `notice`, logging instead of failing.
    pub async fn dispatch(&self, notice: &TaskNotice) {
        if !self.settings.is_enabled() {
            debug!(task_id = %notice.task_id(), "notifications disabled");
            return;
        }
        match self.deliver(notice).await {
            Ok(message) => info!(
                task_id = %notice.task_id(),
                to = %message.to,
                "task notification sent"
            ),
            Err(NotificationError::NoRecipient(task_id)) => {
                debug!(task_id = %task_id, "task has no worker, notification skipped");
            }
            Err(err) => warn!(
                task_id = %notice.task_id(),
                error = %err,
                "task notification failed"
            ),
        }
    }

    /// Resolves, renders and sends the notification for `notice`.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError`] when a participant cannot be resolved,
    /// a template fails to render, or the notifier rejects the message.
    pub async fn deliver(&self, notice: &TaskNotice) -> Result<OutgoingMessage, NotificationError> {
        let recipient_id = notice
            .recipient()
            .ok_or(NotificationError::NoRecipient(notice.task_id()))?;
        let editor_id = notice
            .editor()
            .ok_or(NotificationError::NoEditor(notice.task_id()))?;

        let recipient = self.resolve_user(recipient_id).await?;
        let to = recipient
            .email()
            .cloned()
            .ok_or_else(|| NotificationError::MissingEmail(recipient.username().clone()))?;
        let editor = self.resolve_user(editor_id).await?;

        let templates = self.settings.templates();
        let (subject_template, body_template, old_status, new_status) = match notice.kind() {
            TaskNoticeKind::WorkerAssigned => (
                &templates.assigned_subject,
                &templates.assigned_body,
                String::new(),
                String::new(),
            ),
            TaskNoticeKind::StatusChanged { from, to: target } => (
                &templates.status_changed_subject,
                &templates.status_changed_body,
                self.status_label(from).await?,
                self.status_label(target).await?,
            ),
        };

        let mut context = Map::new();
        context.insert(
            "recipient".to_owned(),
            Value::String(recipient.username().as_str().to_owned()),
        );
        context.insert(
            "editor".to_owned(),
            Value::String(editor.username().as_str().to_owned()),
        );
        context.insert(
            "editor_email".to_owned(),
            Value::String(
                editor
                    .email()
                    .map(|email| email.as_str().to_owned())
                    .unwrap_or_default(),
            ),
        );
        context.insert(
            "task".to_owned(),
            Value::String(notice.task_name().to_owned()),
        );
        context.insert("old_status".to_owned(), Value::String(old_status));
        context.insert("new_status".to_owned(), Value::String(new_status));

        let message = OutgoingMessage {
            from: self.settings.sender().clone(),
            to,
            subject: render(subject_template, &context)?,
            body: render(body_template, &context)?,
        };
        self.notifier.send(&message).await?;
        Ok(message)
    }

    async fn resolve_user(&self, id: UserId) -> Result<User, NotificationError> {
        self.directory
            .find_by_id(id)
            .await?
            .ok_or(NotificationError::UnknownUser(id))
    }

    async fn status_label(&self, id: Option<StatusId>) -> Result<String, NotificationError> {
        let Some(status_id) = id else {
            return Ok(NO_STATUS_LABEL.to_owned());
        };
        Ok(self
            .statuses
            .find_status(status_id)
            .await?
            .map_or_else(
                || NO_STATUS_LABEL.to_owned(),
                |status| status.name().as_str().to_owned(),
            ))
    }
}

fn render(template: &str, context: &Map<String, Value>) -> Result<String, NotificationError> {
    Environment::new()
        .render_str(template, context)
        .map_err(|err| NotificationError::Render(err.to_string()))
}
