//! Frames pushed to subscribers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use blog_core::error::AppError;
use blog_entity::notification::{Notification, NotificationType};

use crate::stream_id::StreamId;

/// Event name of every frame on the notification stream.
pub const EVENT_NAME: &str = "SseNotification";

/// One frame: `{id, event-name, data}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushEvent {
    /// Stream id of the frame.
    pub id: StreamId,
    /// Event name.
    pub name: &'static str,
    /// Frame payload.
    pub data: String,
}

impl PushEvent {
    /// The acknowledgement sent when a connection opens.
    pub fn ack(connection_id: &StreamId) -> Self {
        Self {
            id: connection_id.clone(),
            name: EVENT_NAME,
            data: format!("EventStream Created. [userId={}]", connection_id.user_id),
        }
    }

    /// A notification frame carrying the JSON view of `notification`.
    pub fn notification(id: StreamId, notification: &Notification) -> Result<Self, AppError> {
        let data = serde_json::to_string(&NotificationView::from(notification))?;
        Ok(Self {
            id,
            name: EVENT_NAME,
            data,
        })
    }
}

/// Client-facing view of a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    /// Notification id.
    pub id: i64,
    /// Recipient.
    pub user_id: String,
    /// Trigger.
    pub notification_type: NotificationType,
    /// Text.
    pub content: String,
    /// Link target.
    pub url: String,
    /// Read flag.
    pub is_read: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<&Notification> for NotificationView {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id,
            user_id: n.user_id.clone(),
            notification_type: n.notification_type,
            content: n.content.clone(),
            url: n.url.clone(),
            is_read: n.is_read,
            created_at: n.created_at,
        }
    }
}
