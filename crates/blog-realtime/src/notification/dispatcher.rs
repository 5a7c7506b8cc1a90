//! Notification dispatcher: a bounded queue drained by a fixed worker pool.
//!
//! Triggering requests submit a [`NewNotification`] and return immediately.
//! Workers persist it and fan it out through the [`SubscriptionRegistry`];
//! failures are logged and never reach the submitter.

use std::sync::Arc;

use tokio::sync::{Mutex, broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use blog_core::config::realtime::{DispatcherConfig, OverflowPolicy};
use blog_entity::notification::NewNotification;

use crate::connection::registry::SubscriptionRegistry;

/// Result of a [`NotificationDispatcher::submit`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Accepted into the queue.
    Queued,
    /// Queue was full; parked on a detached task until capacity frees up.
    Deferred,
    /// Queue was full (or the pool stopped) and the job was dropped.
    Rejected,
}

/// Bounded worker pool dispatching notifications.
#[derive(Debug)]
pub struct NotificationDispatcher {
    sender: mpsc::Sender<NewNotification>,
    /// Shared by the workers; held here so the queue outlives an empty pool.
    receiver: Arc<Mutex<mpsc::Receiver<NewNotification>>>,
    overflow: OverflowPolicy,
    workers: Vec<JoinHandle<()>>,
}

impl NotificationDispatcher {
    /// Spawn `config.workers` workers that stop when `shutdown` fires.
    pub fn start(
        config: &DispatcherConfig,
        registry: Arc<dyn SubscriptionRegistry>,
        shutdown: &broadcast::Sender<()>,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..config.workers)
            .map(|worker_id| {
                tokio::spawn(run_worker(
                    worker_id,
                    receiver.clone(),
                    registry.clone(),
                    shutdown.subscribe(),
                ))
            })
            .collect();

        info!(
            workers = config.workers,
            queue_capacity = config.queue_capacity,
            overflow = ?config.overflow,
            "Notification dispatcher started"
        );

        Self {
            sender,
            receiver,
            overflow: config.overflow,
            workers,
        }
    }

    /// Submit a notification without waiting for it to be delivered.
    pub fn submit(&self, notification: NewNotification) -> SubmitOutcome {
        match self.sender.try_send(notification) {
            Ok(()) => SubmitOutcome::Queued,
            Err(mpsc::error::TrySendError::Closed(job)) => {
                warn!(user_id = %job.user_id, "Dispatcher stopped; notification dropped");
                SubmitOutcome::Rejected
            }
            Err(mpsc::error::TrySendError::Full(job)) => match self.overflow {
                OverflowPolicy::Reject => {
                    warn!(user_id = %job.user_id, "Dispatch queue full; notification rejected");
                    SubmitOutcome::Rejected
                }
                OverflowPolicy::Queue => {
                    let sender = self.sender.clone();
                    tokio::spawn(async move {
                        if let Err(e) = sender.send(job).await {
                            warn!(user_id = %e.0.user_id, "Dispatcher stopped; deferred notification dropped");
                        }
                    });
                    SubmitOutcome::Deferred
                }
            },
        }
    }

    /// Jobs waiting in the queue.
    pub fn queued(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }

    /// Close the queue so deferred submissions stop waiting for capacity.
    pub async fn close(&self) {
        self.receiver.lock().await.close();
    }

    /// Number of running worker tasks.
    pub fn worker_count(&self) -> usize {
        self.workers.iter().filter(|w| !w.is_finished()).count()
    }
}

async fn run_worker(
    worker_id: usize,
    receiver: Arc<Mutex<mpsc::Receiver<NewNotification>>>,
    registry: Arc<dyn SubscriptionRegistry>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        let job = tokio::select! {
            _ = shutdown.recv() => break,
            job = async { receiver.lock().await.recv().await } => job,
        };
        let Some(job) = job else {
            break;
        };

        match registry.dispatch(&job).await {
            Ok(row) => debug!(worker_id, notification_id = row.id, "Dispatch job done"),
            Err(e) => error!(
                worker_id,
                user_id = %job.user_id,
                error = %e,
                "Dispatch job failed"
            ),
        }
    }
    debug!(worker_id, "Dispatch worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use blog_core::config::RealtimeConfig;
    use blog_database::NotificationStore;
    use blog_database::memory::MemoryNotificationStore;
    use blog_entity::notification::NotificationType;

    use crate::connection::registry::LocalSubscriptionRegistry;

    fn job(user_id: &str) -> NewNotification {
        NewNotification {
            user_id: user_id.into(),
            notification_type: NotificationType::Comment,
            content: "new comment".into(),
            url: "/post/7".into(),
        }
    }

    fn setup(
        workers: usize,
        queue_capacity: usize,
        overflow: OverflowPolicy,
    ) -> (
        NotificationDispatcher,
        Arc<MemoryNotificationStore>,
        broadcast::Sender<()>,
    ) {
        let store = Arc::new(MemoryNotificationStore::new());
        let registry = Arc::new(LocalSubscriptionRegistry::new(
            &RealtimeConfig::default(),
            store.clone(),
        ));
        let (shutdown, _) = broadcast::channel(1);
        let config = DispatcherConfig {
            workers,
            queue_capacity,
            overflow,
        };
        let dispatcher = NotificationDispatcher::start(&config, registry, &shutdown);
        (dispatcher, store, shutdown)
    }

    async fn wait_for_unread(store: &MemoryNotificationStore, user: &str, expected: i64) {
        for _ in 0..100 {
            if store.count_unread(user).await.unwrap() == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expected {expected} notifications for {user}");
    }

    #[tokio::test]
    async fn test_full_queue_rejects() {
        let (dispatcher, _, _shutdown) = setup(0, 1, OverflowPolicy::Reject);
        assert_eq!(dispatcher.submit(job("alice")), SubmitOutcome::Queued);
        assert_eq!(dispatcher.submit(job("alice")), SubmitOutcome::Rejected);
        assert_eq!(dispatcher.queued(), 1);
    }

    #[tokio::test]
    async fn test_full_queue_defers_then_delivers() {
        let (dispatcher, store, _shutdown) = setup(2, 1, OverflowPolicy::Queue);
        let outcomes: Vec<_> = (0..5).map(|_| dispatcher.submit(job("alice"))).collect();
        assert!(outcomes.iter().all(|o| *o != SubmitOutcome::Rejected));
        wait_for_unread(&store, "alice", 5).await;
    }

    #[tokio::test]
    async fn test_workers_stop_on_shutdown() {
        let (dispatcher, store, shutdown) = setup(2, 8, OverflowPolicy::Reject);
        dispatcher.submit(job("bob"));
        wait_for_unread(&store, "bob", 1).await;

        shutdown.send(()).unwrap();
        for _ in 0..100 {
            if dispatcher.worker_count() == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(dispatcher.worker_count(), 0);

        dispatcher.close().await;
        assert_eq!(dispatcher.submit(job("bob")), SubmitOutcome::Rejected);
    }
}
