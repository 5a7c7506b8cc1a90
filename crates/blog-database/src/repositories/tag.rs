//! Tag repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use blog_core::error::{AppError, ErrorKind};
use blog_core::result::AppResult;
use blog_entity::content::Tag;

use crate::store::TagStore;

/// Repository for tags and post-tag links.
#[derive(Debug, Clone)]
pub struct TagRepository {
    pool: PgPool,
}

impl TagRepository {
    /// Create a new tag repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagStore for TagRepository {
    /// Replace the tags linked to a post, creating unknown tag names.
    async fn replace_for_post(&self, post_id: i64, names: &[String]) -> AppResult<Vec<Tag>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to clear tags", e))?;

        let mut tags = Vec::with_capacity(names.len());
        for name in names {
            let tag = sqlx::query_as::<_, Tag>(
                "INSERT INTO tags (name) VALUES ($1) \
                 ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name RETURNING *",
            )
            .bind(name)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save tag", e))?;

            sqlx::query(
                "INSERT INTO post_tags (post_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(post_id)
            .bind(tag.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to link tag", e))?;

            tags.push(tag);
        }

        tx.commit()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit tags", e))?;
        Ok(tags)
    }

    /// Tags linked to a post.
    async fn find_by_post(&self, post_id: i64) -> AppResult<Vec<Tag>> {
        sqlx::query_as::<_, Tag>(
            "SELECT t.* FROM tags t JOIN post_tags pt ON pt.tag_id = t.id \
             WHERE pt.post_id = $1 ORDER BY t.name ASC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list tags", e))
    }
}
