//! CORS layer configuration.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderName};
use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use blog_core::config::AuthConfig;
use blog_core::config::app::CorsConfig;

/// Builds a CORS tower layer from configuration.
///
/// Credentials are allowed so the refresh cookie travels, which rules out
/// wildcards; a `*` origin therefore mirrors the request origin. The access
/// header is exposed so clients can pick up rotated tokens.
pub fn build_cors_layer(config: &CorsConfig, auth: &AuthConfig) -> CorsLayer {
    let origin = if config.allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::mirror_request()
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        AllowOrigin::list(origins)
    };

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();

    let mut exposed = vec![AUTHORIZATION];
    if let Ok(name) = HeaderName::from_bytes(auth.access_header.as_bytes()) {
        if name != AUTHORIZATION {
            exposed.push(name);
        }
    }

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(methods)
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, HeaderName::from_static("last-event-id")])
        .expose_headers(exposed)
        .allow_credentials(true)
        .max_age(Duration::from_secs(config.max_age_seconds))
}
