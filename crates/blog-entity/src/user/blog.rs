//! Blog entity. Each user owns exactly one blog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user's blog.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Blog {
    /// Blog identifier.
    pub id: i64,
    /// Owner's login handle.
    pub user_id: String,
    /// When the blog was created.
    pub created_at: DateTime<Utc>,
    /// Set when the owner withdraws.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Blog {
    /// Whether `user_id` owns this blog.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}
