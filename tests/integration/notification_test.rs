//! Integration tests for the SSE notification stream and notification endpoints.

use std::time::Duration;

use axum::body::{Body, BodyDataStream};
use axum::http::{Request, StatusCode, header};
use futures::StreamExt;
use tower::ServiceExt;

use blog_auth::Identity;
use blog_entity::notification::{NewNotification, NotificationType};
use blog_entity::user::UserRole;
use blog_realtime::SubmitOutcome;
use blog_service::PostForm;

use crate::helpers::{Credentials, TestApp};

/// Reads whole SSE frames off a response body.
struct FrameReader {
    stream: BodyDataStream,
    buffer: String,
}

/// One parsed SSE frame.
#[derive(Debug)]
struct Frame {
    id: String,
    event: String,
    data: String,
}

impl FrameReader {
    async fn next_frame(&mut self) -> Frame {
        loop {
            if let Some(end) = self.buffer.find("\n\n") {
                let raw: String = self.buffer.drain(..end + 2).collect();
                // Keep-alive comments carry no fields.
                if raw.lines().all(|l| l.starts_with(':') || l.is_empty()) {
                    continue;
                }
                return parse_frame(&raw);
            }
            let chunk = tokio::time::timeout(Duration::from_secs(5), self.stream.next())
                .await
                .expect("frame within timeout")
                .expect("stream open")
                .expect("chunk");
            self.buffer.push_str(std::str::from_utf8(&chunk).expect("utf8"));
        }
    }
}

fn parse_frame(raw: &str) -> Frame {
    let mut frame = Frame {
        id: String::new(),
        event: String::new(),
        data: String::new(),
    };
    for line in raw.lines() {
        if let Some(v) = line.strip_prefix("id: ") {
            frame.id = v.to_string();
        } else if let Some(v) = line.strip_prefix("event: ") {
            frame.event = v.to_string();
        } else if let Some(v) = line.strip_prefix("data: ") {
            frame.data = v.to_string();
        }
    }
    frame
}

async fn subscribe(app: &TestApp, access: &str, last_event_id: Option<&str>) -> FrameReader {
    let mut builder = Request::builder()
        .method("GET")
        .uri("/api/notifications/subscribe")
        .header(header::AUTHORIZATION, format!("Bearer {access}"));
    if let Some(id) = last_event_id {
        builder = builder.header("Last-Event-ID", id);
    }
    let response = app
        .router
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/event-stream"), "{content_type}");

    FrameReader {
        stream: response.into_body().into_data_stream(),
        buffer: String::new(),
    }
}

fn comment_for(user_id: &str, content: &str) -> NewNotification {
    NewNotification {
        user_id: user_id.to_string(),
        notification_type: NotificationType::Comment,
        content: content.to_string(),
        url: "/post/1".to_string(),
    }
}

#[tokio::test]
async fn test_subscribe_requires_sign_in() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "GET",
            "/api/notifications/subscribe",
            None,
            Credentials::default(),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_subscribe_acks_then_delivers() {
    let app = TestApp::new().await;
    app.create_user("alice", "pw-alice-1").await;
    let (access, _) = app.sign_in("alice", "pw-alice-1").await;

    let mut reader = subscribe(&app, &access, None).await;
    let ack = reader.next_frame().await;
    assert_eq!(ack.event, "SseNotification");
    assert!(ack.id.starts_with("alice_"));
    assert!(ack.data.contains("userId=alice"));

    let outcome = app
        .state
        .realtime
        .dispatcher
        .submit(comment_for("alice", "bob commented"));
    assert_eq!(outcome, SubmitOutcome::Queued);

    let frame = reader.next_frame().await;
    assert!(frame.id.starts_with("alice_"));
    assert_ne!(frame.id, ack.id);
    let view: serde_json::Value = serde_json::from_str(&frame.data).unwrap();
    assert_eq!(view["content"], "bob commented");
    assert_eq!(view["isRead"], false);
}

#[tokio::test]
async fn test_comment_pushes_frame_to_post_writer() {
    let app = TestApp::new().await;
    app.create_user("frank", "pw-frank-1").await;
    app.create_user("grace", "pw-grace-1").await;
    let (frank, _) = app.sign_in("frank", "pw-frank-1").await;
    let (grace, _) = app.sign_in("grace", "pw-grace-1").await;

    let post = app
        .state
        .posts
        .register(
            &Identity::new("frank", vec![UserRole::Admin]),
            PostForm {
                title: "first post".into(),
                content: "body".into(),
            },
            &[],
            &[],
        )
        .await
        .unwrap();

    let mut reader = subscribe(&app, &frank, None).await;
    reader.next_frame().await;

    let response = app
        .request(
            "POST",
            &format!("/api/comments/{}/{}", post.blog_id, post.post_id),
            Some(serde_json::json!({ "content": "grace was here" })),
            Credentials::access(&grace),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

    let frame = reader.next_frame().await;
    assert!(frame.id.starts_with("frank_"));
    let view: serde_json::Value = serde_json::from_str(&frame.data).unwrap();
    assert_eq!(view["content"], "grace was here");
    assert_eq!(view["url"], format!("/post/{}", post.post_id));
}

#[tokio::test]
async fn test_reconnect_replays_missed_events() {
    let app = TestApp::new().await;
    app.create_user("carol", "pw-carol-1").await;
    let (access, _) = app.sign_in("carol", "pw-carol-1").await;

    let mut first = subscribe(&app, &access, None).await;
    first.next_frame().await;
    app.state
        .realtime
        .dispatcher
        .submit(comment_for("carol", "one"));
    let seen = first.next_frame().await;
    drop(first);

    app.state
        .realtime
        .dispatcher
        .submit(comment_for("carol", "two"));
    // Let a worker persist it with nobody listening.
    for _ in 0..50 {
        if app.notifications.write_count() >= 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    // The replay cache is filled right after the insert returns.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let mut second = subscribe(&app, &access, Some(&seen.id)).await;
    let ack = second.next_frame().await;
    assert!(ack.data.contains("userId=carol"));
    let replayed = second.next_frame().await;
    let view: serde_json::Value = serde_json::from_str(&replayed.data).unwrap();
    assert_eq!(view["content"], "two");
}

#[tokio::test]
async fn test_mark_read_list_and_unread_count() {
    let app = TestApp::new().await;
    app.create_user("dave", "pw-dave-1").await;
    app.create_user("erin", "pw-erin-1").await;
    let (dave, _) = app.sign_in("dave", "pw-dave-1").await;
    let (erin, _) = app.sign_in("erin", "pw-erin-1").await;

    app.state
        .realtime
        .dispatcher
        .submit(comment_for("dave", "hello"));
    for _ in 0..50 {
        if app.notifications.write_count() >= 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    let count = app
        .request(
            "GET",
            "/api/notifications/unread-count",
            None,
            Credentials::access(&dave),
        )
        .await;
    assert_eq!(count.body["data"]["count"], 1);

    let list = app
        .request("GET", "/api/notifications", None, Credentials::access(&dave))
        .await;
    assert_eq!(list.status, StatusCode::OK);
    let id = list.body["data"]["list"][0]["id"].as_i64().unwrap();

    let foreign = app
        .request(
            "PATCH",
            &format!("/api/notifications/{id}/read"),
            None,
            Credentials::access(&erin),
        )
        .await;
    assert_eq!(foreign.status, StatusCode::FORBIDDEN);

    for _ in 0..2 {
        let read = app
            .request(
                "PATCH",
                &format!("/api/notifications/{id}/read"),
                None,
                Credentials::access(&dave),
            )
            .await;
        assert_eq!(read.status, StatusCode::OK);
    }
    // One insert plus one read flip; the repeat is a no-op.
    assert_eq!(app.notifications.write_count(), 2);

    let missing = app
        .request(
            "PATCH",
            "/api/notifications/999/read",
            None,
            Credentials::access(&dave),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.error_code(), Some("NOT_EXIST_NOTIFICATION"));

    let count = app
        .request(
            "GET",
            "/api/notifications/unread-count",
            None,
            Credentials::access(&dave),
        )
        .await;
    assert_eq!(count.body["data"]["count"], 0);
}

#[tokio::test]
async fn test_health_reports_dependencies() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", "/api/health", None, Credentials::default())
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["cache"], "connected");
    assert_eq!(response.body["data"]["database"], "unavailable");
}
