//! Service configuration loaded from a TOML file.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working local configuration:
//!
//! ```toml
//! [database]
//! url = "postgres://localhost/zira"
//! max_connections = 8
//!
//! [notifications]
//! enabled = true
//! sender = "noreply@zira.local"
//!
//! [workflow]
//! default_statuses = ["Open", "In Progress", "In Review", "Done", "Deleted"]
//!
//! [logging]
//! filter = "info"
//! ansi = true
//! ```

use crate::account::domain::{AccountDomainError, EmailAddress};
use crate::tracker::{
    domain::{DEFAULT_STATUS_NAMES, EntityKind, ItemName, TrackerDomainError},
    services::{NotificationSettings, NotificationTemplates},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`ZiraConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The database URL is blank.
    #[error("database.url must not be empty")]
    EmptyDatabaseUrl,

    /// The connection pool would be empty.
    #[error("database.max_connections must be at least 1")]
    NoConnections,

    /// The notification sender is not a valid address.
    #[error("notifications.sender is invalid: {0}")]
    InvalidSender(#[source] AccountDomainError),

    /// A default status name is invalid.
    #[error("workflow.default_statuses contains an invalid name: {0}")]
    InvalidStatusName(#[source] TrackerDomainError),

    /// A default status name appears twice.
    #[error("workflow.default_statuses lists {0:?} more than once")]
    DuplicateStatusName(String),
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZiraConfig {
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Task notification settings.
    pub notifications: NotificationConfig,
    /// Workflow seeding settings.
    pub workflow: WorkflowConfig,
    /// Log output settings.
    pub logging: LoggingConfig,
}

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of pooled connections.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/zira".to_owned(),
            max_connections: 8,
        }
    }
}

/// Task notification settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotificationConfig {
    /// Whether notifications are sent at all.
    pub enabled: bool,
    /// Sender address on every message.
    pub sender: String,
    /// Subject template for assignment notices.
    pub assigned_subject: String,
    /// Body template for assignment notices.
    pub assigned_body: String,
    /// Subject template for status-change notices.
    pub status_changed_subject: String,
    /// Body template for status-change notices.
    pub status_changed_body: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        let templates = NotificationTemplates::default();
        Self {
            enabled: true,
            sender: "noreply@zira.local".to_owned(),
            assigned_subject: templates.assigned_subject,
            assigned_body: templates.assigned_body,
            status_changed_subject: templates.status_changed_subject,
            status_changed_body: templates.status_changed_body,
        }
    }
}

/// Workflow seeding settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkflowConfig {
    /// Status names seeded into each new project, in workflow order.
    pub default_statuses: Vec<String>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            default_statuses: DEFAULT_STATUS_NAMES.iter().map(|name| (*name).to_owned()).collect(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing-subscriber` filter directive, overridden by `RUST_LOG`.
    pub filter: String,
    /// Whether to colour log output.
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
            ansi: true,
        }
    }
}

impl ZiraConfig {
    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the text is not valid TOML for this
    /// structure or a value fails validation.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read, or any
    /// error from [`Self::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks values that deserialization cannot.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::EmptyDatabaseUrl);
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::NoConnections);
        }
        self.notification_settings()?;
        self.default_status_names()?;
        Ok(())
    }

    /// Builds the notification settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSender`] when the sender address is
    /// invalid.
    pub fn notification_settings(&self) -> Result<NotificationSettings, ConfigError> {
        let notifications = &self.notifications;
        let sender =
            EmailAddress::new(notifications.sender.as_str()).map_err(ConfigError::InvalidSender)?;
        Ok(NotificationSettings::new(sender)
            .with_enabled(notifications.enabled)
            .with_templates(NotificationTemplates {
                assigned_subject: notifications.assigned_subject.clone(),
                assigned_body: notifications.assigned_body.clone(),
                status_changed_subject: notifications.status_changed_subject.clone(),
                status_changed_body: notifications.status_changed_body.clone(),
            }))
    }

    /// Returns the validated default status names.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidStatusName`] for an invalid name and
    /// [`ConfigError::DuplicateStatusName`] for a repeated one.
    pub fn default_status_names(&self) -> Result<Vec<ItemName>, ConfigError> {
        let mut seen = HashSet::new();
        self.workflow
            .default_statuses
            .iter()
            .map(|raw| {
                let name = ItemName::new(EntityKind::Status, raw.as_str())
                    .map_err(ConfigError::InvalidStatusName)?;
                if !seen.insert(name.as_str().to_owned()) {
                    return Err(ConfigError::DuplicateStatusName(name.as_str().to_owned()));
                }
                Ok(name)
            })
            .collect()
    }
}
