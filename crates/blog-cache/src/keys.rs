//! Cache key builders for every blog cache entry.
//!
//! Keys carry no global prefix here; the Redis provider applies the
//! configured prefix.

// ── Session keys ───────────────────────────────────────────

/// Refresh token currently held by a user.
pub fn refresh_by_user(user_id: &str) -> String {
    format!("refresh:user:{user_id}")
}

/// Owner of a refresh token.
pub fn refresh_by_token(token: &str) -> String {
    format!("refresh:token:{token}")
}

// ── Email verification keys ────────────────────────────────

/// Pending verification code for an email address.
pub fn email_code(email: &str) -> String {
    format!("email:code:{}", email.to_lowercase())
}

/// Marker that an email address passed verification.
pub fn email_verified(email: &str) -> String {
    format!("email:verified:{}", email.to_lowercase())
}

// ── Post keys ──────────────────────────────────────────────

/// Cached view of a popular post.
pub fn popular_post(post_id: i64) -> String {
    format!("popular:post:{post_id}")
}
