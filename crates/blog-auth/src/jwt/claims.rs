//! JWT claims carried by access and refresh tokens.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use blog_entity::user::UserRole;

/// Separator between role names inside the `ROLE` claim.
pub const ROLE_DELIMITER: &str = "<?>";

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenType {
    /// Short-lived token carrying identity and roles.
    Access,
    /// Long-lived anonymous token, valid only while held in the session store.
    Refresh,
}

/// Claims payload.
///
/// Access tokens fill `sub`, `ROLE` and `iss`. Refresh tokens carry only
/// `type`, `exp` and a unique `jti`, so identity must come from the session
/// store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's login handle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Roles joined by [`ROLE_DELIMITER`].
    #[serde(rename = "ROLE", default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Token kind.
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Issuer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Unique token id; keeps two refresh tokens minted in the same second distinct.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Join roles into the `ROLE` claim value.
    pub fn join_roles(roles: &[UserRole]) -> String {
        roles
            .iter()
            .map(UserRole::as_str)
            .collect::<Vec<_>>()
            .join(ROLE_DELIMITER)
    }

    /// Roles embedded in the token. Unknown names are skipped.
    pub fn roles(&self) -> Vec<UserRole> {
        self.role
            .as_deref()
            .map(|joined| {
                joined
                    .split(ROLE_DELIMITER)
                    .filter_map(|r| r.parse().ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether `exp` has passed.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}
