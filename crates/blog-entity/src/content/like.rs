//! Like entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user's like on a post. At most one per (user, post).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Liked {
    /// Like identifier.
    pub id: i64,
    /// Liking user.
    pub user_id: String,
    /// Liked post.
    pub post_id: i64,
}
