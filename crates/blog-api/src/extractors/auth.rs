//! Identity extractors backed by the authentication gate middleware.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use blog_auth::Identity;
use blog_core::error::{AppError, ErrorCode};

use crate::error::ApiError;

/// The signed-in caller. Rejects with `NOT_SIGNED_IN` otherwise.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl std::ops::Deref for AuthUser {
    type Target = Identity;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        identity_of(parts)
            .map(AuthUser)
            .ok_or_else(|| ApiError(AppError::coded(ErrorCode::NotSignedIn)))
    }
}

fn identity_of(parts: &Parts) -> Option<Identity> {
    parts.extensions.get::<Option<Identity>>().cloned().flatten()
}
