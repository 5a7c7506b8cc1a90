//! Top-level real-time engine that ties the registry and dispatcher together.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::info;

use blog_core::config::RealtimeConfig;
use blog_core::result::AppResult;
use blog_database::NotificationStore;

use crate::connection::registry::{LocalSubscriptionRegistry, SubscriptionRegistry};
use crate::notification::dispatcher::NotificationDispatcher;

/// Central engine owning the subscription registry and the dispatch pool.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Open push connections and replay.
    pub registry: Arc<dyn SubscriptionRegistry>,
    /// Off-request notification dispatch.
    pub dispatcher: Arc<NotificationDispatcher>,
    /// Shutdown signal sender.
    shutdown_tx: broadcast::Sender<()>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine").finish()
    }
}

impl RealtimeEngine {
    /// Build the engine with an in-process registry. Must run inside a Tokio
    /// runtime since dispatch workers are spawned immediately.
    pub fn new(config: &RealtimeConfig, store: Arc<dyn NotificationStore>) -> Self {
        let registry: Arc<dyn SubscriptionRegistry> =
            Arc::new(LocalSubscriptionRegistry::new(config, store));
        Self::with_registry(config, registry)
    }

    /// Build the engine around an existing registry.
    pub fn with_registry(config: &RealtimeConfig, registry: Arc<dyn SubscriptionRegistry>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        let dispatcher = Arc::new(NotificationDispatcher::start(
            &config.dispatcher,
            registry.clone(),
            &shutdown_tx,
        ));

        info!("Real-time engine initialized");

        Self {
            registry,
            dispatcher,
            shutdown_tx,
        }
    }

    /// Stop the dispatch workers and drop every open connection.
    pub async fn shutdown(&self) -> AppResult<()> {
        info!("Shutting down real-time engine");

        let _ = self.shutdown_tx.send(());
        self.dispatcher.close().await;
        self.registry.close_all();

        info!("Real-time engine shut down");
        Ok(())
    }
}
