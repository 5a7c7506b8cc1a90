//! Connection pool: all open push connections indexed by exact user id.

use std::sync::Arc;

use dashmap::DashMap;

use crate::stream_id::StreamId;

use super::handle::ConnectionHandle;

/// Thread-safe pool of open connections.
#[derive(Debug, Default)]
pub struct ConnectionPool {
    /// User id → that user's connections.
    by_user: DashMap<String, Vec<Arc<ConnectionHandle>>>,
}

impl ConnectionPool {
    /// Creates a new empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection.
    pub fn add(&self, handle: Arc<ConnectionHandle>) {
        self.by_user
            .entry(handle.id.user_id.clone())
            .or_default()
            .push(handle);
    }

    /// Removes a connection. Returns it if it was present.
    pub fn remove(&self, id: &StreamId) -> Option<Arc<ConnectionHandle>> {
        let mut connections = self.by_user.get_mut(&id.user_id)?;
        let position = connections.iter().position(|c| c.id == *id)?;
        let removed = connections.remove(position);
        if connections.is_empty() {
            drop(connections);
            self.by_user.remove_if(&id.user_id, |_, conns| conns.is_empty());
        }
        Some(removed)
    }

    /// Snapshot of a user's connections.
    pub fn get_user_connections(&self, user_id: &str) -> Vec<Arc<ConnectionHandle>> {
        self.by_user
            .get(user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Number of open connections for a user.
    pub fn user_connection_count(&self, user_id: &str) -> usize {
        self.by_user.get(user_id).map(|c| c.len()).unwrap_or(0)
    }

    /// Total number of open connections.
    pub fn connection_count(&self) -> usize {
        self.by_user.iter().map(|entry| entry.value().len()).sum()
    }

    /// Drops every connection.
    pub fn clear(&self) {
        self.by_user.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn handle(user: &str, seq: u64) -> Arc<ConnectionHandle> {
        let (tx, _rx) = mpsc::channel(1);
        Arc::new(ConnectionHandle::new(StreamId::new(user, seq), tx))
    }

    #[test]
    fn test_lookup_is_exact() {
        let pool = ConnectionPool::new();
        pool.add(handle("alice", 1));
        pool.add(handle("alicebob", 2));

        let alice = pool.get_user_connections("alice");
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].id, StreamId::new("alice", 1));
        assert!(pool.get_user_connections("ali").is_empty());
    }

    #[test]
    fn test_remove() {
        let pool = ConnectionPool::new();
        pool.add(handle("alice", 1));
        pool.add(handle("alice", 2));

        assert!(pool.remove(&StreamId::new("alice", 1)).is_some());
        assert!(pool.remove(&StreamId::new("alice", 1)).is_none());
        assert_eq!(pool.user_connection_count("alice"), 1);

        pool.remove(&StreamId::new("alice", 2));
        assert_eq!(pool.connection_count(), 0);
    }
}
