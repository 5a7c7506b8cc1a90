//! The receiving half of a push connection.

use std::sync::Arc;
use std::time::Duration;

use futures::Stream;
use tokio::sync::mpsc;
use tracing::debug;

use crate::connection::pool::ConnectionPool;
use crate::event::PushEvent;
use crate::stream_id::StreamId;

/// Removes the connection from its pool when dropped.
#[derive(Debug)]
pub struct ConnectionGuard {
    id: StreamId,
    pool: Arc<ConnectionPool>,
}

impl ConnectionGuard {
    pub(crate) fn new(id: StreamId, pool: Arc<ConnectionPool>) -> Self {
        Self { id, pool }
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        if self.pool.remove(&self.id).is_some() {
            debug!(connection_id = %self.id, "Push connection deregistered");
        }
    }
}

/// An open subscription returned by
/// [`SubscriptionRegistry::open`](crate::SubscriptionRegistry::open).
///
/// The ack frame and any replayed frames are already buffered. Dropping the
/// subscription deregisters the connection.
#[derive(Debug)]
pub struct Subscription {
    /// Connection id.
    pub id: StreamId,
    pub(crate) receiver: mpsc::Receiver<PushEvent>,
    _guard: ConnectionGuard,
    idle_timeout: Duration,
}

impl Subscription {
    pub(crate) fn new(
        id: StreamId,
        receiver: mpsc::Receiver<PushEvent>,
        guard: ConnectionGuard,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            id,
            receiver,
            _guard: guard,
            idle_timeout,
        }
    }

    /// Next frame, or `None` once the connection was dropped by the registry
    /// or stayed idle past the timeout.
    pub async fn recv(&mut self) -> Option<PushEvent> {
        match tokio::time::timeout(self.idle_timeout, self.receiver.recv()).await {
            Ok(event) => event,
            Err(_) => {
                debug!(connection_id = %self.id, "Push connection idle timeout");
                None
            }
        }
    }

    /// Turn the subscription into a stream of frames.
    ///
    /// The stream ends on idle timeout or deregistration; dropping it
    /// deregisters the connection.
    pub fn into_stream(self) -> impl Stream<Item = PushEvent> + Send + 'static {
        futures::stream::unfold(self, |mut subscription| async move {
            let event = subscription.recv().await?;
            Some((event, subscription))
        })
    }
}
