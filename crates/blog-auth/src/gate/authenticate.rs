//! Access-token check with refresh-token rotation.
//!
//! Per request:
//! 1. A valid, unexpired `ACCESS` token installs its identity.
//! 2. Otherwise a valid, unexpired `REFRESH` token that is the current
//!    session entry of a live user is rotated: the role is re-derived, a new
//!    pair is minted, and the new refresh token is stored before the outcome
//!    is returned.
//! 3. Otherwise the request proceeds anonymously.
//!
//! None of these steps fails the request.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use blog_core::config::AuthConfig;
use blog_core::error::ErrorCode;
use blog_core::result::AppResult;
use blog_database::UserStore;
use blog_entity::user::{BlogUser, UserRole};

use crate::jwt::{TokenCodec, TokenPair, TokenType};
use crate::session::SessionStore;

use super::identity::Identity;

/// What the gate decided for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// The access token was accepted as is.
    Authenticated(Identity),
    /// The refresh token was rotated; the caller must hand out the new pair.
    Rotated {
        /// Identity derived from the session store.
        identity: Identity,
        /// Newly minted tokens, already persisted.
        tokens: TokenPair,
    },
    /// No usable credential; any refresh cookie must be cleared.
    Anonymous,
}

impl GateOutcome {
    /// The identity to install, if any.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) | Self::Rotated { identity, .. } => Some(identity),
            Self::Anonymous => None,
        }
    }
}

/// Validates credentials and rotates refresh sessions.
#[derive(Debug, Clone)]
pub struct AuthenticationGate {
    codec: Arc<TokenCodec>,
    sessions: Arc<dyn SessionStore>,
    users: Arc<dyn UserStore>,
    token_prefix: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl AuthenticationGate {
    /// Create a gate.
    pub fn new(
        config: &AuthConfig,
        codec: Arc<TokenCodec>,
        sessions: Arc<dyn SessionStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            codec,
            sessions,
            users,
            token_prefix: config.token_prefix.clone(),
            access_ttl: Duration::from_secs(config.access_ttl_seconds),
            refresh_ttl: Duration::from_secs(config.refresh_ttl_seconds),
        }
    }

    /// Refresh token lifetime, used for the cookie max-age.
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Strip the configured prefix from an `Authorization` header value.
    pub fn strip_prefix<'a>(&self, header: &'a str) -> Option<&'a str> {
        header
            .strip_prefix(self.token_prefix.as_str())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Decide the identity of a request from its raw credentials.
    pub async fn authenticate(&self, access: Option<&str>, refresh: Option<&str>) -> GateOutcome {
        if let Some(identity) = access.and_then(|token| self.accept_access(token)) {
            return GateOutcome::Authenticated(identity);
        }

        if let Some(token) = refresh {
            match self.rotate(token).await {
                Ok(Some((identity, tokens))) => {
                    info!(user_id = %identity.user_id, "Refresh token rotated");
                    return GateOutcome::Rotated { identity, tokens };
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Refresh rotation failed; continuing anonymously"),
            }
        }

        GateOutcome::Anonymous
    }

    /// Mint a token pair for `user` and make the refresh token their session.
    pub async fn issue(&self, user: &BlogUser) -> AppResult<(Identity, TokenPair)> {
        let role = match self.users.find_blog_by_user_id(&user.user_id).await? {
            Some(blog) => UserRole::for_blog(&blog, user),
            None => UserRole::Member,
        };
        let identity = Identity::new(user.user_id.clone(), vec![role]);

        let tokens = TokenPair {
            access_token: self
                .codec
                .issue_access(&identity.user_id, &identity.roles, self.access_ttl)?,
            refresh_token: self.codec.issue_refresh(self.refresh_ttl)?,
        };
        self.sessions
            .save(&identity.user_id, &tokens.refresh_token, self.refresh_ttl)
            .await?;

        Ok((identity, tokens))
    }

    /// End the user's session.
    pub async fn revoke(&self, user_id: &str) -> AppResult<()> {
        self.sessions.delete(user_id).await
    }

    fn accept_access(&self, token: &str) -> Option<Identity> {
        let claims = match self.codec.verify(token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(error = %e, "Access token rejected");
                return None;
            }
        };
        if TokenCodec::is_expired(&claims) || TokenCodec::token_type(&claims) != TokenType::Access
        {
            return None;
        }
        let roles = claims.roles();
        claims.sub.map(|sub| Identity::new(sub, roles))
    }

    async fn rotate(&self, token: &str) -> AppResult<Option<(Identity, TokenPair)>> {
        let claims = match self.codec.verify(token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(error = %e, "Refresh token rejected");
                return Ok(None);
            }
        };
        if TokenCodec::is_expired(&claims) || TokenCodec::token_type(&claims) != TokenType::Refresh
        {
            return Ok(None);
        }

        let Some(user_id) = self.sessions.find_user_by_token(token).await? else {
            debug!(code = ErrorCode::SessionNotFound.as_str(), "Refresh token has no session");
            return Ok(None);
        };

        let user = match self.users.find_by_user_id(&user_id).await? {
            Some(user) if !user.is_withdrawn() => user,
            _ => {
                self.sessions.delete(&user_id).await?;
                return Ok(None);
            }
        };

        self.issue(&user).await.map(Some)
    }
}
