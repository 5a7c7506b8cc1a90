//! Request DTOs.

use serde::{Deserialize, Serialize};

/// Sign-in credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    /// Login handle.
    pub user_id: String,
    /// Password.
    pub password: String,
}

/// `?email=` query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

/// `?email=&code=` query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationCheckQuery {
    pub email: String,
    pub code: String,
}

/// `?postId=` query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeQuery {
    pub post_id: i64,
}

/// Query fallback for clients that cannot set `Last-Event-ID`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeQuery {
    #[serde(default)]
    pub last_event_id: Option<String>,
}
