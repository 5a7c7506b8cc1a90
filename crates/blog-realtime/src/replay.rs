//! Bounded per-user cache of recently dispatched events.
//!
//! Each user keeps at most `capacity` events, and events older than
//! `max_age` are never replayed. Replay is best-effort and process-local.

use std::collections::VecDeque;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

use crate::event::PushEvent;
use crate::stream_id::StreamId;

#[derive(Debug, Clone)]
struct CachedEvent {
    event: PushEvent,
    stored_at: Instant,
}

/// Ring buffer of events per user.
#[derive(Debug)]
pub struct ReplayCache {
    by_user: DashMap<String, VecDeque<CachedEvent>>,
    capacity: usize,
    max_age: Duration,
}

impl ReplayCache {
    /// Create a cache keeping `capacity` events per user for at most `max_age`.
    pub fn new(capacity: usize, max_age: Duration) -> Self {
        Self {
            by_user: DashMap::new(),
            capacity,
            max_age,
        }
    }

    /// Most events kept per user, and so the longest possible replay.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Remember an event for its owner.
    pub fn store(&self, event: PushEvent) {
        if self.capacity == 0 {
            return;
        }
        let now = Instant::now();
        let mut ring = self.by_user.entry(event.id.user_id.clone()).or_default();
        self.evict_aged(&mut ring, now);
        while ring.len() >= self.capacity {
            ring.pop_front();
        }
        ring.push_back(CachedEvent {
            event,
            stored_at: now,
        });
    }

    /// Cached events of `last_seen`'s user generated after it, oldest first.
    pub fn after(&self, last_seen: &StreamId) -> Vec<PushEvent> {
        let Some(mut ring) = self.by_user.get_mut(&last_seen.user_id) else {
            return Vec::new();
        };
        self.evict_aged(&mut ring, Instant::now());

        let mut events: Vec<PushEvent> = ring
            .iter()
            .filter(|cached| cached.event.id.follows(last_seen))
            .map(|cached| cached.event.clone())
            .collect();
        events.sort_by_key(|e| e.id.seq);
        events
    }

    fn evict_aged(&self, ring: &mut VecDeque<CachedEvent>, now: Instant) {
        while ring
            .front()
            .is_some_and(|front| now.duration_since(front.stored_at) > self.max_age)
        {
            ring.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EVENT_NAME;

    fn event(user: &str, seq: u64) -> PushEvent {
        PushEvent {
            id: StreamId::new(user, seq),
            name: EVENT_NAME,
            data: format!("payload-{seq}"),
        }
    }

    fn ids(events: &[PushEvent]) -> Vec<String> {
        events.iter().map(|e| e.id.to_string()).collect()
    }

    #[test]
    fn test_replays_only_newer_events_in_order() {
        let cache = ReplayCache::new(10, Duration::from_secs(600));
        cache.store(event("alice", 300));
        cache.store(event("alice", 100));
        cache.store(event("alice", 200));

        let replay = cache.after(&"alice_150".parse().unwrap());
        assert_eq!(ids(&replay), vec!["alice_200", "alice_300"]);
    }

    #[test]
    fn test_other_users_events_never_replay() {
        let cache = ReplayCache::new(10, Duration::from_secs(600));
        cache.store(event("alicebob", 500));
        cache.store(event("alice", 200));

        let replay = cache.after(&StreamId::new("alice", 0));
        assert_eq!(ids(&replay), vec!["alice_200"]);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let cache = ReplayCache::new(2, Duration::from_secs(600));
        for seq in 1..=3 {
            cache.store(event("alice", seq));
        }
        assert_eq!(
            ids(&cache.after(&StreamId::new("alice", 0))),
            vec!["alice_2", "alice_3"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_aged_events_are_evicted() {
        let cache = ReplayCache::new(10, Duration::from_secs(60));
        cache.store(event("alice", 1));
        tokio::time::advance(Duration::from_secs(61)).await;
        cache.store(event("alice", 2));

        assert_eq!(
            ids(&cache.after(&StreamId::new("alice", 0))),
            vec!["alice_2"]
        );
    }
}
