//! Like repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use blog_core::error::{AppError, ErrorKind};
use blog_core::result::AppResult;

use crate::store::LikeStore;

/// Repository for post likes.
#[derive(Debug, Clone)]
pub struct LikeRepository {
    pool: PgPool,
}

impl LikeRepository {
    /// Create a new like repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeStore for LikeRepository {
    /// Record a like and return the post's new like count.
    ///
    /// Returns `None` when the user already liked the post.
    async fn add(&self, user_id: &str, post_id: i64) -> AppResult<Option<i32>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let inserted = sqlx::query(
            "INSERT INTO liked (user_id, post_id) VALUES ($1, $2) \
             ON CONFLICT (user_id, post_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(post_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to add like", e))?
        .rows_affected();

        if inserted == 0 {
            return Ok(None);
        }

        let count: i32 = sqlx::query_scalar(
            "UPDATE posts SET like_count = like_count + 1 WHERE id = $1 RETURNING like_count",
        )
        .bind(post_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count like", e))?;

        tx.commit()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit like", e))?;
        Ok(Some(count))
    }

    /// Remove a like and return the post's new like count.
    ///
    /// Returns `None` when there was no like to remove.
    async fn remove(&self, user_id: &str, post_id: i64) -> AppResult<Option<i32>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let removed = sqlx::query("DELETE FROM liked WHERE user_id = $1 AND post_id = $2")
            .bind(user_id)
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to remove like", e))?
            .rows_affected();

        if removed == 0 {
            return Ok(None);
        }

        let count: i32 = sqlx::query_scalar(
            "UPDATE posts SET like_count = GREATEST(like_count - 1, 0) WHERE id = $1 \
             RETURNING like_count",
        )
        .bind(post_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count like", e))?;

        tx.commit()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit unlike", e))?;
        Ok(Some(count))
    }
}
