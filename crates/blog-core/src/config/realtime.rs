//! Push subscription and notification dispatch configuration.

use serde::{Deserialize, Serialize};

/// What the dispatcher does when its queue is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Drop the job and log a warning.
    Reject,
    /// Park the submission on a detached task until capacity frees up.
    Queue,
}

/// Real-time configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// A push stream with no delivered event for this long is closed.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
    /// Outbound buffer per push connection.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Maximum events kept per user for replay.
    #[serde(default = "default_replay_capacity")]
    pub replay_capacity: usize,
    /// Maximum age of a replayable event in seconds.
    #[serde(default = "default_replay_max_age")]
    pub replay_max_age_seconds: u64,
    /// Interval between SSE keep-alive comments in seconds.
    #[serde(default = "default_keep_alive")]
    pub keep_alive_seconds: u64,
    /// Notification dispatch worker pool settings.
    #[serde(default)]
    pub dispatcher: DispatcherConfig,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            idle_timeout_seconds: default_idle_timeout(),
            channel_buffer_size: default_channel_buffer(),
            replay_capacity: default_replay_capacity(),
            replay_max_age_seconds: default_replay_max_age(),
            keep_alive_seconds: default_keep_alive(),
            dispatcher: DispatcherConfig::default(),
        }
    }
}

/// Notification dispatcher worker pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Number of worker tasks.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Bounded queue capacity.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Behavior when the queue is full.
    #[serde(default = "default_overflow")]
    pub overflow: OverflowPolicy,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            queue_capacity: default_queue_capacity(),
            overflow: default_overflow(),
        }
    }
}

fn default_idle_timeout() -> u64 {
    60
}

fn default_channel_buffer() -> usize {
    64
}

fn default_replay_capacity() -> usize {
    100
}

fn default_replay_max_age() -> u64 {
    10 * 60
}

fn default_keep_alive() -> u64 {
    15
}

fn default_workers() -> usize {
    4
}

fn default_queue_capacity() -> usize {
    1024
}

fn default_overflow() -> OverflowPolicy {
    OverflowPolicy::Reject
}
