//! Post repository implementation.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use blog_core::error::{AppError, ErrorKind};
use blog_core::result::AppResult;
use blog_core::types::pagination::{PageResult, Pagination, SearchParams, SearchType};
use blog_entity::content::{CreatePost, Post};

use crate::store::PostStore;

/// Sort order for post listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOrder {
    /// Newest first.
    Latest,
    /// Most liked first, newest among ties.
    Popular,
}

impl PostOrder {
    fn clause(self) -> &'static str {
        match self {
            Self::Latest => " ORDER BY p.id DESC",
            Self::Popular => " ORDER BY p.like_count DESC, p.id DESC",
        }
    }
}

/// Repository for posts and their attached image rows.
#[derive(Debug, Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    /// Create a new post repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PostRepository {
    /// Create a post together with its image URLs.
    async fn create(&self, data: &CreatePost, file_urls: &[String]) -> AppResult<Post> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let post = sqlx::query_as::<_, Post>(
            "INSERT INTO posts (blog_id, user_id, nickname, title, content) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(data.blog_id)
        .bind(&data.user_id)
        .bind(&data.nickname)
        .bind(&data.title)
        .bind(&data.content)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create post", e))?;

        insert_files(&mut tx, post.id, file_urls).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit post", e))?;
        Ok(post)
    }

    /// Find a live post by ID.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Post>> {
        sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find post", e))
    }

    /// Replace title, body and images of a post.
    async fn update(
        &self,
        id: i64,
        title: &str,
        content: &str,
        file_urls: &[String],
    ) -> AppResult<Post> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let post = sqlx::query_as::<_, Post>(
            "UPDATE posts SET title = $2, content = $3, modified_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING *",
        )
        .bind(id)
        .bind(title)
        .bind(content)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update post", e))?
        .ok_or_else(|| AppError::not_found(format!("Post {id} not found")))?;

        sqlx::query("DELETE FROM post_files WHERE post_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to clear files", e))?;
        insert_files(&mut tx, id, file_urls).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit post", e))?;
        Ok(post)
    }

    /// Soft-delete a post and remove its comments, images and tag links.
    async fn soft_delete(&self, id: i64) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        for sql in [
            "DELETE FROM comments WHERE post_id = $1",
            "DELETE FROM post_files WHERE post_id = $1",
            "DELETE FROM post_tags WHERE post_id = $1",
            "UPDATE posts SET deleted_at = NOW() WHERE id = $1",
        ] {
            sqlx::query(sql)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete post", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit delete", e))
    }

    /// Image URLs of a post in upload order.
    async fn find_files(&self, post_id: i64) -> AppResult<Vec<String>> {
        sqlx::query_scalar(
            "SELECT file_url FROM post_files WHERE post_id = $1 ORDER BY position ASC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list post files", e))
    }

    /// Increment the view counter.
    async fn increment_view(&self, id: i64) -> AppResult<()> {
        sqlx::query("UPDATE posts SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count view", e))?;
        Ok(())
    }

    /// Search live posts, newest first.
    async fn search(&self, params: SearchParams) -> AppResult<PageResult<Post>> {
        self.list(params, None, PostOrder::Latest).await
    }

    /// Live posts ordered by like count.
    async fn popular(&self, params: SearchParams) -> AppResult<PageResult<Post>> {
        self.list(params, None, PostOrder::Popular).await
    }

    /// Live posts carrying a tag, newest first.
    async fn find_by_tag(
        &self,
        tag_name: &str,
        params: SearchParams,
    ) -> AppResult<PageResult<Post>> {
        self.list(params, Some(tag_name), PostOrder::Latest).await
    }
}

impl PostRepository {
    async fn list(
        &self,
        mut params: SearchParams,
        tag_name: Option<&str>,
        order: PostOrder,
    ) -> AppResult<PageResult<Post>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM posts p");
        push_filters(&mut count, &params, tag_name);
        let total: i64 = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count posts", e))?;

        if total < 1 {
            return Ok(PageResult::empty());
        }
        let pagination = Pagination::new(total, &mut params);

        let mut query = QueryBuilder::<Postgres>::new("SELECT p.* FROM posts p");
        push_filters(&mut query, &params, tag_name);
        query.push(order.clause());
        query.push(" LIMIT ").push_bind(params.record_size);
        query.push(" OFFSET ").push_bind(pagination.limit_start);

        let list = query
            .build_query_as::<Post>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list posts", e))?;

        Ok(PageResult {
            list,
            pagination: Some(pagination),
        })
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, params: &SearchParams, tag_name: Option<&str>) {
    if let Some(tag) = tag_name {
        qb.push(
            " JOIN post_tags pt ON pt.post_id = p.id JOIN tags t ON t.id = pt.tag_id \
             WHERE p.deleted_at IS NULL AND t.name = ",
        )
        .push_bind(tag.to_string());
    } else {
        qb.push(" WHERE p.deleted_at IS NULL");
    }

    let Some(pattern) = params.like_pattern() else {
        return;
    };
    match params.search_type {
        Some(SearchType::Title) => {
            qb.push(" AND p.title ILIKE ").push_bind(pattern);
        }
        Some(SearchType::Content) => {
            qb.push(" AND p.content ILIKE ").push_bind(pattern);
        }
        Some(SearchType::Writer) => {
            qb.push(" AND p.nickname ILIKE ").push_bind(pattern);
        }
        None => {
            qb.push(" AND (p.title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR p.content ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
    }
}

async fn insert_files(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    post_id: i64,
    file_urls: &[String],
) -> AppResult<()> {
    for (position, url) in file_urls.iter().enumerate() {
        sqlx::query("INSERT INTO post_files (post_id, file_url, position) VALUES ($1, $2, $3)")
            .bind(post_id)
            .bind(url)
            .bind(position as i32)
            .execute(&mut **tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save post file", e))?;
    }
    Ok(())
}
