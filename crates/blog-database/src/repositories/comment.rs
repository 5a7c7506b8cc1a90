//! Comment repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use blog_core::error::{AppError, ErrorKind};
use blog_core::result::AppResult;
use blog_entity::content::{Comment, CreateComment};

use crate::store::CommentStore;

/// Repository for post comments.
#[derive(Debug, Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    /// Create a new comment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentStore for CommentRepository {
    /// Insert a comment and bump the post's comment count.
    async fn create(&self, data: &CreateComment) -> AppResult<Comment> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let comment = sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (blog_id, post_id, user_id, content) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(data.blog_id)
        .bind(data.post_id)
        .bind(&data.user_id)
        .bind(&data.content)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create comment", e))?;

        sqlx::query("UPDATE posts SET comment_count = comment_count + 1 WHERE id = $1")
            .bind(data.post_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count comment", e)
            })?;

        tx.commit()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit comment", e))?;
        Ok(comment)
    }

    /// Find a comment by ID.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Comment>> {
        sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find comment", e))
    }

    /// Comments on a post, oldest first.
    async fn find_by_post(&self, post_id: i64) -> AppResult<Vec<Comment>> {
        sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE post_id = $1 ORDER BY id ASC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list comments", e))
    }

    /// Replace a comment's text.
    async fn update(&self, id: i64, content: &str) -> AppResult<Comment> {
        sqlx::query_as::<_, Comment>(
            "UPDATE comments SET content = $2, modified_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update comment", e))?
        .ok_or_else(|| AppError::not_found(format!("Comment {id} not found")))
    }

    /// Delete a comment and decrement the post's comment count.
    async fn delete(&self, comment: &Comment) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete comment", e))?;

        sqlx::query(
            "UPDATE posts SET comment_count = GREATEST(comment_count - 1, 0) WHERE id = $1",
        )
        .bind(comment.post_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count comment", e))?;

        tx.commit()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit delete", e))
    }
}
