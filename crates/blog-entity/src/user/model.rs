//! Blog user entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered blog user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BlogUser {
    /// Surrogate primary key.
    pub id: i64,
    /// Unique login handle; the identity carried in tokens.
    pub user_id: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Unique email address.
    pub email: String,
    /// Real name.
    pub user_name: String,
    /// Unique display name.
    pub nickname: String,
    /// Contact number.
    pub phone_number: Option<String>,
    /// Public URL of the profile image.
    pub profile_image_url: String,
    /// When the user signed up.
    pub created_at: DateTime<Utc>,
    /// Last profile update.
    pub updated_at: Option<DateTime<Utc>>,
    /// Set when the user withdraws.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl BlogUser {
    /// Whether the account has been withdrawn.
    pub fn is_withdrawn(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Login handle.
    pub user_id: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Email address.
    pub email: String,
    /// Real name.
    pub user_name: String,
    /// Display name.
    pub nickname: String,
    /// Contact number.
    pub phone_number: Option<String>,
    /// Profile image URL (uploaded or default).
    pub profile_image_url: String,
}
