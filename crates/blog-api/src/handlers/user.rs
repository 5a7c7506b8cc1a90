//! Account handlers: sign-up, verification, sign-in/out, withdrawal, profile.

use axum::Json;
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use blog_service::account::{SignUpRequest, UserProfile};

use crate::dto::request::{EmailQuery, SignInRequest, VerificationCheckQuery};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, MultipartForm};
use crate::middleware::auth::{append_cookie, attach_tokens, removal_cookie};
use crate::state::AppState;

/// POST /api/users
pub async fn sign_up(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<UserProfile>>), ApiError> {
    let form = MultipartForm::read(multipart).await?;
    let request: SignUpRequest = form.request()?;
    let profile = state.accounts.sign_up(request, form.first_file()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(profile))))
}

/// POST /api/users/send-verification-code?email=
pub async fn send_verification_code(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.verification.send_code(query.email.trim()).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Verification code sent",
    ))))
}

/// POST /api/users/send-verification-code/check?email=&code=
pub async fn check_verification_code(
    State(state): State<AppState>,
    Query(query): Query<VerificationCheckQuery>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .verification
        .check_code(query.email.trim(), &query.code)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Email verified"))))
}

/// POST /api/users/sign-in
pub async fn sign_in(
    State(state): State<AppState>,
    Json(body): Json<SignInRequest>,
) -> Result<Response, ApiError> {
    let signed_in = state.accounts.sign_in(&body.user_id, &body.password).await?;

    let mut response = Json(ApiResponse::ok(signed_in.profile)).into_response();
    attach_tokens(&mut response, &state.config.auth, &signed_in.tokens);
    Ok(response)
}

/// POST /api/users/sign-out
pub async fn sign_out(State(state): State<AppState>, auth: AuthUser) -> Result<Response, ApiError> {
    state.accounts.sign_out(&auth).await?;

    let mut response = Json(ApiResponse::ok(MessageResponse::new("Signed out"))).into_response();
    append_cookie(&mut response, removal_cookie(&state.config.auth));
    Ok(response)
}

/// DELETE /api/users/withdraw
pub async fn withdraw(State(state): State<AppState>, auth: AuthUser) -> Result<Response, ApiError> {
    state.accounts.withdraw(&auth).await?;

    let mut response = Json(ApiResponse::ok(MessageResponse::new("Withdrawn"))).into_response();
    append_cookie(&mut response, removal_cookie(&state.config.auth));
    Ok(response)
}

/// GET /api/users/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.accounts.me(&auth).await?)))
}
