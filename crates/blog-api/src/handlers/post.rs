//! Post handlers.

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;

use blog_core::types::pagination::{PageResult, SearchParams};
use blog_service::content::{PostForm, PostSummary, PostView};

use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, MultipartForm};
use crate::state::AppState;

/// POST /api/post/register
pub async fn register(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<PostView>>), ApiError> {
    let form = MultipartForm::read(multipart).await?;
    let request: PostForm = form.request()?;
    let view = state
        .posts
        .register(&auth, request, &form.files, &form.tags)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(view))))
}

/// PATCH /api/post/update/{post_id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(post_id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<PostView>>, ApiError> {
    let form = MultipartForm::read(multipart).await?;
    let request: PostForm = form.request()?;
    let view = state
        .posts
        .update(&auth, post_id, request, &form.files, &form.tags)
        .await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// DELETE /api/post/{post_id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(post_id): Path<i64>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.posts.delete(&auth, post_id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Post deleted"))))
}

/// GET /api/post/{post_id}
pub async fn get(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<Json<ApiResponse<PostView>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.posts.get(post_id).await?)))
}

/// GET /api/post/list
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<PageResult<PostSummary>>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.posts.search(params).await?)))
}

/// GET /api/post/popular
pub async fn popular(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<PageResult<PostSummary>>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.posts.popular(params).await?)))
}

/// GET /api/post/tag/{tag_name}
pub async fn by_tag(
    State(state): State<AppState>,
    Path(tag_name): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<PageResult<PostSummary>>>, ApiError> {
    Ok(Json(ApiResponse::ok(
        state.posts.by_tag(&tag_name, params).await?,
    )))
}
