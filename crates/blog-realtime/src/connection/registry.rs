//! Subscription registry: open connections, dispatch fan-out, and replay.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use blog_core::config::RealtimeConfig;
use blog_core::result::AppResult;
use blog_database::NotificationStore;
use blog_entity::notification::{NewNotification, Notification};

use crate::event::PushEvent;
use crate::replay::ReplayCache;
use crate::stream_id::{SequenceTable, StreamId};
use crate::subscription::{ConnectionGuard, Subscription};

use super::handle::{ConnectionHandle, PushError};
use super::pool::ConnectionPool;

/// Bookkeeping of push connections and the notifications sent to them.
#[async_trait]
pub trait SubscriptionRegistry: Send + Sync + std::fmt::Debug + 'static {
    /// Open a connection for `user_id`.
    ///
    /// The returned subscription already holds the ack frame and, when
    /// `last_event_id` names an earlier event of the same user, every cached
    /// event after it in ascending order. Events dispatched while the
    /// connection opens may arrive twice; clients dedupe by event id.
    async fn open(&self, user_id: &str, last_event_id: Option<&str>) -> AppResult<Subscription>;

    /// Persist a notification and push it to every open connection of its
    /// recipient. A failed push drops only that connection.
    async fn dispatch(&self, notification: &NewNotification) -> AppResult<Notification>;

    /// Mark a notification read. Returns `false` when it already was.
    async fn mark_read(&self, notification_id: i64) -> AppResult<bool>;

    /// Deregister a connection.
    fn close(&self, connection_id: &StreamId);

    /// Number of open connections for `user_id`.
    fn connection_count(&self, user_id: &str) -> usize;

    /// Drop every connection.
    fn close_all(&self);
}

/// In-process [`SubscriptionRegistry`].
#[derive(Debug)]
pub struct LocalSubscriptionRegistry {
    pool: Arc<ConnectionPool>,
    replay: ReplayCache,
    sequences: SequenceTable,
    store: Arc<dyn NotificationStore>,
    channel_buffer_size: usize,
    idle_timeout: Duration,
}

impl LocalSubscriptionRegistry {
    /// Create a registry persisting through `store`.
    pub fn new(config: &RealtimeConfig, store: Arc<dyn NotificationStore>) -> Self {
        Self {
            pool: Arc::new(ConnectionPool::new()),
            replay: ReplayCache::new(
                config.replay_capacity,
                Duration::from_secs(config.replay_max_age_seconds),
            ),
            sequences: SequenceTable::new(),
            store,
            channel_buffer_size: config.channel_buffer_size.max(1),
            idle_timeout: Duration::from_secs(config.idle_timeout_seconds),
        }
    }

    fn replay_after(&self, user_id: &str, last_event_id: Option<&str>) -> Vec<PushEvent> {
        let Some(raw) = last_event_id else {
            return Vec::new();
        };
        match raw.parse::<StreamId>() {
            Ok(last) if last.user_id == user_id => self.replay.after(&last),
            Ok(_) => {
                warn!(user_id, last_event_id = raw, "Last-Event-ID belongs to another user");
                Vec::new()
            }
            Err(_) => {
                debug!(user_id, last_event_id = raw, "Unparseable Last-Event-ID ignored");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl SubscriptionRegistry for LocalSubscriptionRegistry {
    async fn open(&self, user_id: &str, last_event_id: Option<&str>) -> AppResult<Subscription> {
        let id = self.sequences.next(user_id);

        // Room for the ack and a full replay on top of the live buffer.
        let (tx, rx) = mpsc::channel(self.channel_buffer_size + self.replay.capacity() + 1);
        let handle = Arc::new(ConnectionHandle::new(id.clone(), tx));
        if let Err(e) = handle.try_push(PushEvent::ack(&id)) {
            warn!(connection_id = %id, error = ?e, "Failed to buffer ack frame");
        }

        // Registered before the replay read, so an event dispatched meanwhile
        // is either replayed or pushed live, possibly both.
        self.pool.add(handle.clone());

        let replay = self.replay_after(user_id, last_event_id);
        let replayed = replay.len();
        for event in replay {
            if let Err(e) = handle.try_push(event) {
                warn!(connection_id = %id, error = ?e, "Failed to buffer replayed frames");
                break;
            }
        }
        info!(connection_id = %id, replayed, "Push connection opened");

        let guard = ConnectionGuard::new(id.clone(), self.pool.clone());
        Ok(Subscription::new(id, rx, guard, self.idle_timeout))
    }

    async fn dispatch(&self, notification: &NewNotification) -> AppResult<Notification> {
        let row = self.store.create(notification).await?;

        let event = PushEvent::notification(self.sequences.next(&row.user_id), &row)?;
        self.replay.store(event.clone());

        for connection in self.pool.get_user_connections(&row.user_id) {
            match connection.try_push(event.clone()) {
                Ok(()) => {}
                Err(reason) => {
                    self.pool.remove(&connection.id);
                    match reason {
                        PushError::Closed => {
                            debug!(connection_id = %connection.id, "Dropped closed push connection")
                        }
                        PushError::Full => warn!(
                            connection_id = %connection.id,
                            "Push buffer full; dropping connection so the client replays"
                        ),
                    }
                }
            }
        }

        debug!(
            notification_id = row.id,
            event_id = %event.id,
            "Notification dispatched"
        );
        Ok(row)
    }

    async fn mark_read(&self, notification_id: i64) -> AppResult<bool> {
        self.store.mark_read(notification_id).await
    }

    fn close(&self, connection_id: &StreamId) {
        self.pool.remove(connection_id);
    }

    fn connection_count(&self, user_id: &str) -> usize {
        self.pool.user_connection_count(user_id)
    }

    fn close_all(&self) {
        self.pool.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_database::memory::MemoryNotificationStore;
    use blog_entity::notification::NotificationType;

    use crate::event::NotificationView;

    fn registry() -> (LocalSubscriptionRegistry, Arc<MemoryNotificationStore>) {
        let store = Arc::new(MemoryNotificationStore::new());
        let registry = LocalSubscriptionRegistry::new(&RealtimeConfig::default(), store.clone());
        (registry, store)
    }

    fn comment_for(user_id: &str) -> NewNotification {
        NewNotification {
            user_id: user_id.into(),
            notification_type: NotificationType::Comment,
            content: "someone commented".into(),
            url: "/post/1".into(),
        }
    }

    fn view(event: &PushEvent) -> NotificationView {
        serde_json::from_str(&event.data).unwrap()
    }

    #[tokio::test]
    async fn test_open_sends_ack_first() {
        let (registry, _) = registry();
        let mut sub = registry.open("alice", None).await.unwrap();
        let ack = sub.recv().await.unwrap();
        assert_eq!(ack.id, sub.id);
        assert_eq!(ack.data, "EventStream Created. [userId=alice]");
        assert_eq!(registry.connection_count("alice"), 1);
    }

    #[tokio::test]
    async fn test_dispatch_never_reaches_prefix_sharing_user() {
        let (registry, _) = registry();
        let mut alice = registry.open("alice", None).await.unwrap();
        let mut alicebob = registry.open("alicebob", None).await.unwrap();
        alice.recv().await.unwrap();
        alicebob.recv().await.unwrap();

        registry.dispatch(&comment_for("alice")).await.unwrap();

        let delivered = alice.recv().await.unwrap();
        assert_eq!(view(&delivered).user_id, "alice");
        assert!(alicebob.receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_reconnect_replays_missed_events_in_order() {
        let (registry, _) = registry();
        let mut first = registry.open("alice", None).await.unwrap();
        first.recv().await.unwrap();

        registry.dispatch(&comment_for("alice")).await.unwrap();
        let seen = first.recv().await.unwrap();
        drop(first);

        let missed_a = registry.dispatch(&comment_for("alice")).await.unwrap();
        let missed_b = registry.dispatch(&comment_for("alice")).await.unwrap();

        let mut second = registry
            .open("alice", Some(&seen.id.to_string()))
            .await
            .unwrap();
        second.recv().await.unwrap();
        let a = second.recv().await.unwrap();
        let b = second.recv().await.unwrap();
        assert_eq!(view(&a).id, missed_a.id);
        assert_eq!(view(&b).id, missed_b.id);
        assert!(b.id.follows(&a.id));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_events_dispatched_during_open_are_not_lost() {
        let (registry, _) = registry();
        let registry = Arc::new(registry);
        let mut first = registry.open("alice", None).await.unwrap();
        first.recv().await.unwrap();
        registry.dispatch(&comment_for("alice")).await.unwrap();
        let seen = first.recv().await.unwrap().id.to_string();
        drop(first);

        for _ in 0..20 {
            let writer = registry.clone();
            let burst = tokio::spawn(async move {
                let mut ids = Vec::new();
                for _ in 0..5 {
                    ids.push(writer.dispatch(&comment_for("alice")).await.unwrap().id);
                }
                ids
            });
            let mut sub = registry.open("alice", Some(&seen)).await.unwrap();
            let sent = burst.await.unwrap();

            sub.recv().await.unwrap();
            let mut received = std::collections::HashSet::new();
            while let Ok(event) = sub.receiver.try_recv() {
                received.insert(view(&event).id);
            }
            for id in sent {
                assert!(received.contains(&id), "notification {id} was lost");
            }
        }
    }

    #[tokio::test]
    async fn test_foreign_or_malformed_last_event_id_replays_nothing() {
        let (registry, _) = registry();
        registry.dispatch(&comment_for("alice")).await.unwrap();

        let mut foreign = registry.open("mallory", Some("alice_0")).await.unwrap();
        foreign.recv().await.unwrap();
        assert!(foreign.receiver.try_recv().is_err());

        let mut garbage = registry.open("alice", Some("not-an-id")).await.unwrap();
        garbage.recv().await.unwrap();
        assert!(garbage.receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_failed_push_drops_only_that_connection() {
        let (registry, _) = registry();
        let mut healthy = registry.open("alice", None).await.unwrap();
        healthy.recv().await.unwrap();

        let mut broken = registry.open("alice", None).await.unwrap();
        let broken_id = broken.id.clone();
        // Closed receiving side; the pool entry stays until the next push.
        broken.receiver.close();
        assert_eq!(registry.connection_count("alice"), 2);

        registry.dispatch(&comment_for("alice")).await.unwrap();
        assert_eq!(registry.connection_count("alice"), 1);
        assert!(healthy.recv().await.is_some());

        registry.dispatch(&comment_for("alice")).await.unwrap();
        assert!(healthy.recv().await.is_some());
        assert!(
            registry
                .pool
                .get_user_connections("alice")
                .iter()
                .all(|c| c.id != broken_id)
        );
    }

    #[tokio::test]
    async fn test_mark_read_is_idempotent() {
        let (registry, store) = registry();
        let row = registry.dispatch(&comment_for("alice")).await.unwrap();
        let writes_before = store.write_count();

        assert!(registry.mark_read(row.id).await.unwrap());
        assert!(!registry.mark_read(row.id).await.unwrap());

        assert_eq!(store.write_count(), writes_before + 1);
        assert!(store.find_by_id(row.id).await.unwrap().unwrap().is_read);
    }

    #[tokio::test]
    async fn test_dropping_subscription_deregisters() {
        let (registry, _) = registry();
        let sub = registry.open("alice", None).await.unwrap();
        assert_eq!(registry.connection_count("alice"), 1);
        drop(sub);
        assert_eq!(registry.connection_count("alice"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_subscription_ends() {
        let (registry, _) = registry();
        let mut sub = registry.open("alice", None).await.unwrap();
        sub.recv().await.unwrap();
        assert!(sub.recv().await.is_none());
    }
}
