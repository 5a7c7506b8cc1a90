//! The identity installed for an authenticated request.

use serde::{Deserialize, Serialize};

use blog_core::error::{AppError, ErrorCode};
use blog_entity::user::UserRole;

/// Who is calling and which roles they hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Login handle.
    pub user_id: String,
    /// Roles embedded in the access token.
    pub roles: Vec<UserRole>,
}

impl Identity {
    /// Create an identity.
    pub fn new(user_id: impl Into<String>, roles: Vec<UserRole>) -> Self {
        Self {
            user_id: user_id.into(),
            roles,
        }
    }

    /// Whether the identity holds `role`.
    pub fn has_role(&self, role: UserRole) -> bool {
        self.roles.contains(&role)
    }

    /// Fail with `FORBIDDEN_ACCESS` unless one of `roles` is held.
    pub fn require_any(&self, roles: &[UserRole]) -> Result<(), AppError> {
        if roles.iter().any(|r| self.has_role(*r)) {
            Ok(())
        } else {
            Err(ErrorCode::ForbiddenAccess.into())
        }
    }
}
