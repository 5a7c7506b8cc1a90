//! Session store trait and its cache-backed implementation.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use blog_cache::CacheManager;
use blog_cache::keys;
use blog_core::result::AppResult;
use blog_core::traits::cache::CacheProvider;

/// Maps each user to their single valid refresh token, and back.
///
/// Saving a token for a user replaces the previous one; the previous token
/// no longer resolves to the user afterwards.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Store `token` as the user's refresh token for `ttl`.
    async fn save(&self, user_id: &str, token: &str, ttl: Duration) -> AppResult<()>;

    /// Owner of `token`, if it is the owner's current refresh token.
    async fn find_user_by_token(&self, token: &str) -> AppResult<Option<String>>;

    /// The user's current refresh token.
    async fn find_token_by_user(&self, user_id: &str) -> AppResult<Option<String>>;

    /// Drop the user's session.
    async fn delete(&self, user_id: &str) -> AppResult<()>;
}

/// [`SessionStore`] on top of the configured cache provider.
///
/// Keys: `refresh:user:{userId} -> token` and `refresh:token:{token} -> userId`.
#[derive(Debug, Clone)]
pub struct CacheSessionStore {
    cache: CacheManager,
}

impl CacheSessionStore {
    /// Create a session store over `cache`.
    pub fn new(cache: CacheManager) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl SessionStore for CacheSessionStore {
    async fn save(&self, user_id: &str, token: &str, ttl: Duration) -> AppResult<()> {
        let user_key = keys::refresh_by_user(user_id);
        if let Some(previous) = self.cache.get(&user_key).await? {
            self.cache.delete(&keys::refresh_by_token(&previous)).await?;
        }
        self.cache.set(&keys::refresh_by_token(token), user_id, ttl).await?;
        self.cache.set(&user_key, token, ttl).await?;
        debug!(user_id, "Refresh session stored");
        Ok(())
    }

    async fn find_user_by_token(&self, token: &str) -> AppResult<Option<String>> {
        let Some(user_id) = self.cache.get(&keys::refresh_by_token(token)).await? else {
            return Ok(None);
        };
        // A reverse entry is only honoured while it is still the user's current token.
        let current = self.cache.get(&keys::refresh_by_user(&user_id)).await?;
        Ok((current.as_deref() == Some(token)).then_some(user_id))
    }

    async fn find_token_by_user(&self, user_id: &str) -> AppResult<Option<String>> {
        self.cache.get(&keys::refresh_by_user(user_id)).await
    }

    async fn delete(&self, user_id: &str) -> AppResult<()> {
        let user_key = keys::refresh_by_user(user_id);
        if let Some(token) = self.cache.get(&user_key).await? {
            self.cache.delete(&keys::refresh_by_token(&token)).await?;
        }
        self.cache.delete(&user_key).await?;
        debug!(user_id, "Refresh session deleted");
        Ok(())
    }
}
