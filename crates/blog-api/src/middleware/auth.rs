//! Authentication gate middleware.
//!
//! Runs the [`AuthenticationGate`](blog_auth::AuthenticationGate) on every
//! request, stores the resulting `Option<Identity>` as a request extension,
//! and applies the outcome to the response: a rotated pair sets the access
//! header and a fresh refresh cookie; a rejected refresh cookie is cleared.

use axum::extract::{Request, State};
use axum::http::header::{AUTHORIZATION, SET_COOKIE};
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{debug, warn};

use blog_auth::{GateOutcome, TokenPair};
use blog_core::config::AuthConfig;

use crate::state::AppState;

/// Middleware entry point, mounted with `from_fn_with_state`.
pub async fn authentication_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let auth = &state.config.auth;
    let access = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| state.gate.strip_prefix(h))
        .map(str::to_owned);
    let refresh = jar.get(auth.cookie_name()).map(|c| c.value().to_owned());

    let outcome = state
        .gate
        .authenticate(access.as_deref(), refresh.as_deref())
        .await;
    request
        .extensions_mut()
        .insert(outcome.identity().cloned());

    let mut response = next.run(request).await;

    match outcome {
        GateOutcome::Rotated { identity, tokens } => {
            debug!(user_id = %identity.user_id, "Attaching rotated credentials");
            attach_tokens(&mut response, auth, &tokens);
        }
        GateOutcome::Anonymous if refresh.is_some() => {
            if !sets_cookie(&response, auth.cookie_name()) {
                append_cookie(&mut response, removal_cookie(auth));
            }
        }
        _ => {}
    }

    response
}

/// Put a token pair on a response: the access token in the configured header
/// and the refresh token in the cookie. Values the handler already set win.
pub fn attach_tokens(response: &mut Response, auth: &AuthConfig, tokens: &TokenPair) {
    match (
        HeaderName::from_bytes(auth.access_header.as_bytes()),
        HeaderValue::from_str(&format!("{}{}", auth.token_prefix, tokens.access_token)),
    ) {
        (Ok(name), Ok(value)) => {
            if !response.headers().contains_key(&name) {
                response.headers_mut().insert(name, value);
            }
        }
        _ => warn!(header = %auth.access_header, "Access header not representable"),
    }

    if !sets_cookie(response, auth.cookie_name()) {
        append_cookie(response, refresh_cookie(auth, tokens.refresh_token.clone()));
    }
}

/// Append a `Set-Cookie` header.
pub fn append_cookie(response: &mut Response, cookie: Cookie<'static>) {
    match HeaderValue::from_str(&cookie.to_string()) {
        Ok(value) => {
            response.headers_mut().append(SET_COOKIE, value);
        }
        Err(e) => warn!(error = %e, "Cookie not representable as a header"),
    }
}

/// The refresh cookie carrying `token`.
pub fn refresh_cookie(auth: &AuthConfig, token: String) -> Cookie<'static> {
    let max_age = i64::try_from(auth.refresh_ttl_seconds).unwrap_or(i64::MAX);
    build_cookie(auth, token, time::Duration::seconds(max_age))
}

/// A cookie that makes the client drop the refresh cookie.
pub fn removal_cookie(auth: &AuthConfig) -> Cookie<'static> {
    build_cookie(auth, String::new(), time::Duration::ZERO)
}

fn build_cookie(auth: &AuthConfig, value: String, max_age: time::Duration) -> Cookie<'static> {
    let mut builder = Cookie::build((auth.cookie.name.clone(), value))
        .http_only(true)
        .secure(auth.cookie.secure)
        .path("/")
        .same_site(same_site(&auth.cookie.same_site))
        .max_age(max_age);
    if !auth.cookie.domain.is_empty() {
        builder = builder.domain(auth.cookie.domain.clone());
    }
    builder.build()
}

fn same_site(raw: &str) -> SameSite {
    match raw.to_ascii_lowercase().as_str() {
        "strict" => SameSite::Strict,
        "none" => SameSite::None,
        _ => SameSite::Lax,
    }
}

fn sets_cookie(response: &Response, name: &str) -> bool {
    let prefix = format!("{name}=");
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.starts_with(&prefix))
}
