//! Token, session, and refresh cookie configuration.

use serde::{Deserialize, Serialize};

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign access and refresh tokens.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Value of the `iss` claim on access tokens.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Access token lifetime in seconds.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_seconds: u64,
    /// Refresh token lifetime in seconds (also the session entry TTL).
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_seconds: u64,
    /// Prefix stripped from the `Authorization` header before decoding.
    #[serde(default = "default_token_prefix")]
    pub token_prefix: String,
    /// Response header carrying a freshly rotated access token.
    #[serde(default = "default_access_header")]
    pub access_header: String,
    /// Refresh cookie settings.
    #[serde(default)]
    pub cookie: CookieConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            issuer: default_issuer(),
            access_ttl_seconds: default_access_ttl(),
            refresh_ttl_seconds: default_refresh_ttl(),
            token_prefix: default_token_prefix(),
            access_header: default_access_header(),
            cookie: CookieConfig::default(),
        }
    }
}

/// Refresh cookie attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieConfig {
    /// Cookie name.
    #[serde(default = "default_cookie_name")]
    pub name: String,
    /// Cookie `Domain` attribute; empty means host-only.
    #[serde(default)]
    pub domain: String,
    /// Cookie `SameSite` attribute: `"strict"`, `"lax"` or `"none"`.
    #[serde(default = "default_same_site")]
    pub same_site: String,
    /// Whether the cookie carries the `Secure` attribute.
    #[serde(default = "default_secure")]
    pub secure: bool,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: default_cookie_name(),
            domain: String::new(),
            same_site: default_same_site(),
            secure: default_secure(),
        }
    }
}

impl AuthConfig {
    /// Shortcut for the refresh cookie name.
    pub fn cookie_name(&self) -> &str {
        &self.cookie.name
    }
}

fn default_jwt_secret() -> String {
    "change-me-in-production-this-secret-is-not-safe".to_string()
}

fn default_issuer() -> String {
    "blog-platform".to_string()
}

fn default_access_ttl() -> u64 {
    30 * 60
}

fn default_refresh_ttl() -> u64 {
    7 * 24 * 60 * 60
}

fn default_token_prefix() -> String {
    "Bearer ".to_string()
}

fn default_access_header() -> String {
    "Authorization".to_string()
}

fn default_cookie_name() -> String {
    "REFRESH".to_string()
}

fn default_same_site() -> String {
    "lax".to_string()
}

fn default_secure() -> bool {
    true
}
