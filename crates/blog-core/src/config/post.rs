//! Post listing and popular post cache configuration.

use serde::{Deserialize, Serialize};

/// Post settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostConfig {
    /// Like count at which a post becomes popular.
    #[serde(default = "default_threshold")]
    pub popular_like_threshold: i32,
    /// TTL of a cached popular post in seconds.
    #[serde(default = "default_popular_ttl")]
    pub popular_cache_ttl_seconds: u64,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            popular_like_threshold: default_threshold(),
            popular_cache_ttl_seconds: default_popular_ttl(),
        }
    }
}

fn default_threshold() -> i32 {
    10
}

fn default_popular_ttl() -> u64 {
    60 * 60
}
