//! Read-through cache of popular posts.

use std::time::Duration;

use tracing::debug;

use blog_cache::{CacheManager, keys};
use blog_core::result::AppResult;
use blog_core::traits::CacheProvider;

use super::view::PostView;

/// Caches the full view of posts at or above the like threshold.
#[derive(Debug, Clone)]
pub struct PopularPostCache {
    cache: CacheManager,
    threshold: i32,
    ttl: Duration,
}

impl PopularPostCache {
    /// Create a cache for posts with at least `threshold` likes.
    pub fn new(cache: CacheManager, threshold: i32, ttl: Duration) -> Self {
        Self {
            cache,
            threshold,
            ttl,
        }
    }

    /// Whether a post with this many likes belongs in the cache.
    pub fn qualifies(&self, like_count: i32) -> bool {
        like_count >= self.threshold
    }

    /// Cached view of a post, marked popular.
    pub async fn get(&self, post_id: i64) -> AppResult<Option<PostView>> {
        let view: Option<PostView> = self.cache.get_json(&keys::popular_post(post_id)).await?;
        Ok(view.map(|mut v| {
            v.is_popular = true;
            v
        }))
    }

    /// Store a view.
    pub async fn put(&self, view: &PostView) -> AppResult<()> {
        debug!(post_id = view.post_id, like_count = view.like_count, "Caching popular post");
        self.cache
            .set_json(&keys::popular_post(view.post_id), view, self.ttl)
            .await
    }

    /// Drop a post from the cache.
    pub async fn evict(&self, post_id: i64) -> AppResult<()> {
        self.cache.delete(&keys::popular_post(post_id)).await
    }
}
