//! Notification handlers, including the SSE subscription.

use std::convert::Infallible;
use std::time::Duration;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};
use tracing::debug;

use blog_core::types::pagination::{PageResult, SearchParams};
use blog_realtime::{NotificationView, PushEvent};

use crate::dto::request::SubscribeQuery;
use crate::dto::response::{ApiResponse, CountResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

const LAST_EVENT_ID: &str = "last-event-id";

/// GET /api/notifications/subscribe
///
/// The `Last-Event-ID` header wins over the `lastEventId` query parameter.
pub async fn subscribe(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    Query(query): Query<SubscribeQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let last_event_id = headers
        .get(LAST_EVENT_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .or(query.last_event_id)
        .filter(|id| !id.is_empty());

    let subscription = state
        .notifications
        .subscribe(&auth, last_event_id.as_deref())
        .await?;
    debug!(connection_id = %subscription.id, "SSE stream opened");

    let stream = subscription
        .into_stream()
        .map(|event| Ok::<_, Infallible>(to_sse(event)));
    let keep_alive = Duration::from_secs(state.config.realtime.keep_alive_seconds.max(1));

    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(keep_alive)))
}

fn to_sse(event: PushEvent) -> Event {
    Event::default()
        .id(event.id.to_string())
        .event(event.name)
        .data(event.data)
}

/// GET /api/notifications
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<PageResult<NotificationView>>>, ApiError> {
    Ok(Json(ApiResponse::ok(
        state.notifications.list(&auth, params).await?,
    )))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.notifications.unread_count(&auth).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// PATCH /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.notifications.mark_read(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Marked as read"))))
}
