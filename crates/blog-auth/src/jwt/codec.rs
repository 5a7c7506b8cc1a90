//! Token signing and verification.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use blog_core::config::AuthConfig;
use blog_core::error::{AppError, ErrorCode};
use blog_entity::user::UserRole;

use super::claims::{Claims, TokenType};

/// A freshly minted access/refresh pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
}

/// Encodes, signs and verifies HS256 tokens.
///
/// Storage-agnostic: policy about expiry and token type is left to callers
/// through [`TokenCodec::is_expired`] and [`TokenCodec::token_type`].
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Create a codec from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            issuer: config.issuer.clone(),
        }
    }

    /// Mint an access token for `subject` holding `roles`.
    pub fn issue_access(
        &self,
        subject: &str,
        roles: &[UserRole],
        ttl: Duration,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: Some(subject.to_string()),
            role: Some(Claims::join_roles(roles)),
            token_type: TokenType::Access,
            iss: Some(self.issuer.clone()),
            jti: None,
            exp: expiry(ttl),
        };
        self.sign(&claims)
    }

    /// Mint an anonymous refresh token.
    pub fn issue_refresh(&self, ttl: Duration) -> Result<String, AppError> {
        let claims = Claims {
            sub: None,
            role: None,
            token_type: TokenType::Refresh,
            iss: None,
            jti: Some(Uuid::new_v4().to_string()),
            exp: expiry(ttl),
        };
        self.sign(&claims)
    }

    /// Check the signature and decode the claims.
    ///
    /// Every failure (bad signature, malformed token, missing fields) maps to
    /// `INVALID_TOKEN`. Expired tokens still verify.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::coded_with(ErrorCode::InvalidToken, e))
    }

    /// Whether the token's expiry has passed.
    pub fn is_expired(claims: &Claims) -> bool {
        claims.is_expired()
    }

    /// The token's kind.
    pub fn token_type(claims: &Claims) -> TokenType {
        claims.token_type
    }

    fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }
}

fn expiry(ttl: Duration) -> i64 {
    Utc::now().timestamp() + ttl.as_secs() as i64
}
