//! Structured connection and event identifiers.
//!
//! Rendered as `"{userId}_{seq}"` on the wire. Parsing splits on the
//! right-most `_`, so user ids may themselves contain underscores.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use dashmap::DashMap;

use blog_core::error::AppError;

/// A `{user, sequence}` pair identifying a connection or an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StreamId {
    /// Owning user's login handle.
    pub user_id: String,
    /// Per-user monotonic sequence number.
    pub seq: u64,
}

impl StreamId {
    /// Create a stream id.
    pub fn new(user_id: impl Into<String>, seq: u64) -> Self {
        Self {
            user_id: user_id.into(),
            seq,
        }
    }

    /// Whether `self` belongs to the same user and was generated after `other`.
    ///
    /// Ids of different users are never ordered.
    pub fn follows(&self, other: &StreamId) -> bool {
        self.user_id == other.user_id && self.seq > other.seq
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.user_id, self.seq)
    }
}

impl FromStr for StreamId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (user_id, seq) = s
            .rsplit_once('_')
            .ok_or_else(|| AppError::validation(format!("Malformed stream id: '{s}'")))?;
        if user_id.is_empty() {
            return Err(AppError::validation(format!("Malformed stream id: '{s}'")));
        }
        let seq = seq
            .parse::<u64>()
            .map_err(|_| AppError::validation(format!("Malformed stream id: '{s}'")))?;
        Ok(Self::new(user_id, seq))
    }
}

/// Per-user sequence counters shared by connection ids and event ids.
///
/// Each value is at least the current epoch millisecond and strictly greater
/// than the previous value for the same user, so ids keep increasing across
/// restarts without depending on the clock for ordering.
#[derive(Debug, Default)]
pub struct SequenceTable {
    counters: DashMap<String, AtomicU64>,
}

impl SequenceTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id for `user_id`.
    pub fn next(&self, user_id: &str) -> StreamId {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        let counter = self
            .counters
            .entry(user_id.to_string())
            .or_insert_with(|| AtomicU64::new(0));
        let previous = counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| {
                Some(prev.saturating_add(1).max(now))
            })
            .unwrap_or_else(|prev| prev);
        StreamId::new(user_id, previous.saturating_add(1).max(now))
    }
}
