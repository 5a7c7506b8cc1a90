//! Notification use cases for the recipient.

use std::sync::Arc;

use tracing::info;

use blog_auth::Identity;
use blog_core::error::{AppError, ErrorCode};
use blog_core::result::AppResult;
use blog_core::types::pagination::{PageResult, SearchParams};
use blog_database::NotificationStore;
use blog_realtime::{NotificationView, Subscription, SubscriptionRegistry};

/// Lets a user read their notifications and subscribe to new ones.
#[derive(Debug, Clone)]
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
    registry: Arc<dyn SubscriptionRegistry>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(store: Arc<dyn NotificationStore>, registry: Arc<dyn SubscriptionRegistry>) -> Self {
        Self { store, registry }
    }

    /// Open a push subscription, replaying events after `last_event_id`.
    pub async fn subscribe(
        &self,
        identity: &Identity,
        last_event_id: Option<&str>,
    ) -> AppResult<Subscription> {
        self.registry.open(&identity.user_id, last_event_id).await
    }

    /// Mark one of the caller's notifications read. Repeating it is a no-op.
    pub async fn mark_read(&self, identity: &Identity, notification_id: i64) -> AppResult<()> {
        let notification = self
            .store
            .find_by_id(notification_id)
            .await?
            .ok_or_else(|| AppError::coded(ErrorCode::NotExistNotification))?;
        if notification.user_id != identity.user_id {
            return Err(AppError::coded(ErrorCode::ForbiddenAccess));
        }

        if self.registry.mark_read(notification_id).await? {
            info!(notification_id, user_id = %identity.user_id, "Notification read");
        }
        Ok(())
    }

    /// The caller's notifications, newest first.
    pub async fn list(
        &self,
        identity: &Identity,
        params: SearchParams,
    ) -> AppResult<PageResult<NotificationView>> {
        let page = self
            .store
            .find_by_user(&identity.user_id, params.normalized())
            .await?;
        Ok(page.map(|n| NotificationView::from(&n)))
    }

    /// Number of the caller's unread notifications.
    pub async fn unread_count(&self, identity: &Identity) -> AppResult<i64> {
        self.store.count_unread(&identity.user_id).await
    }
}
