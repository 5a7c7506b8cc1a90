//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// What triggered a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    /// Someone commented on the recipient's post.
    Comment,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comment => f.write_str("COMMENT"),
        }
    }
}

/// A notification addressed to one user.
///
/// Rows are never deleted; the only mutation is the one-way read transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Notification identifier.
    pub id: i64,
    /// Recipient's login handle.
    pub user_id: String,
    /// Trigger.
    pub notification_type: NotificationType,
    /// Text shown to the recipient.
    pub content: String,
    /// Link opened when the notification is clicked.
    pub url: String,
    /// Whether the recipient has read it.
    pub is_read: bool,
    /// When it was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to persist a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNotification {
    /// Recipient's login handle.
    pub user_id: String,
    /// Trigger.
    pub notification_type: NotificationType,
    /// Text shown to the recipient.
    pub content: String,
    /// Link opened when the notification is clicked.
    pub url: String,
}
