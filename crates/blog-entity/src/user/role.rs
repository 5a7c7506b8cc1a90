//! Role enumeration used for authorization checks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::blog::Blog;
use super::model::BlogUser;

/// Roles a caller can hold relative to a blog.
///
/// Roles are never stored; they are derived from blog ownership whenever a
/// token is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    /// The blog owner.
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
    /// A signed-in user who does not own the blog.
    #[serde(rename = "ROLE_MEMBER")]
    Member,
    /// An anonymous caller.
    #[serde(rename = "ROLE_GUEST")]
    Guest,
}

impl UserRole {
    /// Derive the role `user` holds on `blog`.
    pub fn for_blog(blog: &Blog, user: &BlogUser) -> Self {
        if blog.is_owned_by(&user.user_id) {
            Self::Admin
        } else {
            Self::Member
        }
    }

    /// Whether the role may write posts.
    pub fn can_write_posts(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Whether the role may write comments.
    pub fn can_comment(&self) -> bool {
        matches!(self, Self::Admin | Self::Member)
    }

    /// Return the role as it appears in token claims.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ROLE_ADMIN",
            Self::Member => "ROLE_MEMBER",
            Self::Guest => "ROLE_GUEST",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = blog_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ROLE_ADMIN" => Ok(Self::Admin),
            "ROLE_MEMBER" => Ok(Self::Member),
            "ROLE_GUEST" => Ok(Self::Guest),
            _ => Err(blog_core::AppError::validation(format!(
                "Invalid user role: '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(user_id: &str) -> BlogUser {
        BlogUser {
            id: 1,
            user_id: user_id.into(),
            password_hash: String::new(),
            email: format!("{user_id}@example.com"),
            user_name: user_id.into(),
            nickname: user_id.into(),
            phone_number: None,
            profile_image_url: String::new(),
            created_at: Utc::now(),
            updated_at: None,
            deleted_at: None,
        }
    }

    fn blog(owner: &str) -> Blog {
        Blog {
            id: 7,
            user_id: owner.into(),
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_owner_is_admin() {
        assert_eq!(UserRole::for_blog(&blog("alice"), &user("alice")), UserRole::Admin);
        assert_eq!(UserRole::for_blog(&blog("alice"), &user("bob")), UserRole::Member);
    }

    #[test]
    fn test_round_trip_through_claim_string() {
        for role in [UserRole::Admin, UserRole::Member, UserRole::Guest] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
        assert!("admin".parse::<UserRole>().is_err());
    }
}
