//! User and blog repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use blog_core::error::{AppError, ErrorKind};
use blog_core::result::AppResult;
use blog_entity::user::{Blog, BlogUser, CreateUser};

use crate::store::UserStore;

/// Repository for users and the blogs they own.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists_where(&self, column: &'static str, value: &str) -> AppResult<bool> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM blog_users WHERE {column} = $1)");
        sqlx::query_scalar::<_, bool>(&sql)
            .bind(value)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to check user {column}"),
                    e,
                )
            })
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<BlogUser>> {
        sqlx::query_as::<_, BlogUser>("SELECT * FROM blog_users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user", e))
    }

    async fn exists_by_user_id(&self, user_id: &str) -> AppResult<bool> {
        self.exists_where("user_id", user_id).await
    }

    async fn exists_by_nickname(&self, nickname: &str) -> AppResult<bool> {
        self.exists_where("nickname", nickname).await
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        self.exists_where("email", email).await
    }

    async fn register(&self, user: &CreateUser) -> AppResult<(BlogUser, Blog)> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let created = sqlx::query_as::<_, BlogUser>(
            "INSERT INTO blog_users (user_id, password_hash, email, user_name, nickname, phone_number, profile_image_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(&user.user_id)
        .bind(&user.password_hash)
        .bind(&user.email)
        .bind(&user.user_name)
        .bind(&user.nickname)
        .bind(&user.phone_number)
        .bind(&user.profile_image_url)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create user", e))?;

        let blog = sqlx::query_as::<_, Blog>("INSERT INTO blogs (user_id) VALUES ($1) RETURNING *")
            .bind(&user.user_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create blog", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit registration", e)
        })?;

        Ok((created, blog))
    }

    async fn find_blog_by_user_id(&self, user_id: &str) -> AppResult<Option<Blog>> {
        sqlx::query_as::<_, Blog>("SELECT * FROM blogs WHERE user_id = $1 AND deleted_at IS NULL")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find blog", e))
    }

    async fn find_blog_by_id(&self, blog_id: i64) -> AppResult<Option<Blog>> {
        sqlx::query_as::<_, Blog>("SELECT * FROM blogs WHERE id = $1 AND deleted_at IS NULL")
            .bind(blog_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find blog", e))
    }

    async fn withdraw(&self, user_id: &str) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("UPDATE blog_users SET deleted_at = NOW(), updated_at = NOW() WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to withdraw user", e))?;

        sqlx::query("UPDATE blogs SET deleted_at = NOW() WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to withdraw blog", e))?;

        tx.commit()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit withdrawal", e))
    }
}
