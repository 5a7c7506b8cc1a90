//! Like handlers.

use axum::Json;
use axum::extract::{Query, State};

use crate::dto::request::LikeQuery;
use crate::dto::response::{ApiResponse, LikeResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/liked/add-like?postId=
pub async fn add(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<LikeQuery>,
) -> Result<Json<ApiResponse<LikeResponse>>, ApiError> {
    let like_count = state.likes.add(&auth, query.post_id).await?;
    Ok(Json(ApiResponse::ok(LikeResponse {
        post_id: query.post_id,
        like_count,
    })))
}

/// DELETE /api/liked/delete-like?postId=
pub async fn remove(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<LikeQuery>,
) -> Result<Json<ApiResponse<LikeResponse>>, ApiError> {
    let like_count = state.likes.remove(&auth, query.post_id).await?;
    Ok(Json(ApiResponse::ok(LikeResponse {
        post_id: query.post_id,
        like_count,
    })))
}
