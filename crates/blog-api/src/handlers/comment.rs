//! Comment handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use blog_service::content::{CommentForm, CommentView};

use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/comments/{blog_id}/{post_id}
pub async fn register(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((blog_id, post_id)): Path<(i64, i64)>,
    Json(form): Json<CommentForm>,
) -> Result<(StatusCode, Json<ApiResponse<CommentView>>), ApiError> {
    let view = state
        .comments
        .register(&auth, blog_id, post_id, form)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(view))))
}

/// PATCH /api/comments/{comment_id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(comment_id): Path<i64>,
    Json(form): Json<CommentForm>,
) -> Result<Json<ApiResponse<CommentView>>, ApiError> {
    let view = state.comments.update(&auth, comment_id, form).await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// DELETE /api/comments/{comment_id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(comment_id): Path<i64>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.comments.delete(&auth, comment_id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Comment deleted"))))
}
