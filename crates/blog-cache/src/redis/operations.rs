//! Redis cache provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use blog_core::error::{AppError, ErrorKind};
use blog_core::result::AppResult;
use blog_core::traits::cache::CacheProvider;

use super::client::RedisClient;

/// Redis-backed cache provider.
#[derive(Debug, Clone)]
pub struct RedisCacheProvider {
    /// Redis client.
    client: RedisClient,
}

impl RedisCacheProvider {
    /// Create a new Redis cache provider.
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// A connection handle plus the namespaced form of `key`.
    fn scoped(&self, key: &str) -> (redis::aio::ConnectionManager, String) {
        (self.client.conn_mut(), self.client.prefixed_key(key))
    }
}

fn redis_err(e: redis::RedisError) -> AppError {
    AppError::with_source(ErrorKind::Cache, format!("Redis error: {e}"), e)
}

#[async_trait]
impl CacheProvider for RedisCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let (mut conn, key) = self.scoped(key);
        conn.get(&key).await.map_err(redis_err)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let (mut conn, key) = self.scoped(key);
        // SET EX rejects zero
        conn.set_ex::<_, _, ()>(&key, value, ttl.as_secs().max(1))
            .await
            .map_err(redis_err)
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let (mut conn, key) = self.scoped(key);
        conn.del::<_, ()>(&key).await.map_err(redis_err)
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let (mut conn, key) = self.scoped(key);
        conn.exists(&key).await.map_err(redis_err)
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(redis_err)?;
        Ok(pong == "PONG")
    }
}
