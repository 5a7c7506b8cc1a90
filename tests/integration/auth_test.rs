//! Integration tests for sign-up, sign-in, and refresh rotation.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::json;

use blog_database::UserStore;

use crate::helpers::{Credentials, TestApp, multipart_body};

#[tokio::test]
async fn test_sign_in_sets_access_header_and_refresh_cookie() {
    let app = TestApp::new().await;
    app.create_user("alice", "pw-alice-1").await;

    let response = app
        .request(
            "POST",
            "/api/users/sign-in",
            Some(json!({ "userId": "alice", "password": "pw-alice-1" })),
            Credentials::default(),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["userId"], "alice");
    assert!(response.access_token().is_some());

    let cookie = response
        .set_cookies()
        .into_iter()
        .find(|c| c.starts_with("REFRESH="))
        .expect("refresh cookie");
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Path=/"));
}

#[tokio::test]
async fn test_sign_in_wrong_password() {
    let app = TestApp::new().await;
    app.create_user("bob", "pw-bob-1").await;

    let response = app
        .request(
            "POST",
            "/api/users/sign-in",
            Some(json!({ "userId": "bob", "password": "nope" })),
            Credentials::default(),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), Some("SU006"));
    assert!(response.refresh_cookie().is_none());
}

#[tokio::test]
async fn test_protected_route_requires_sign_in() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", "/api/users/me", None, Credentials::default())
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), Some("USER_NOT_SIGNED_IN"));
}

#[tokio::test]
async fn test_valid_access_token_authenticates() {
    let app = TestApp::new().await;
    app.create_user("carol", "pw-carol-1").await;
    let (access, _) = app.sign_in("carol", "pw-carol-1").await;

    let response = app
        .request("GET", "/api/users/me", None, Credentials::access(&access))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["nickname"], "carol-nick");
    assert!(response.refresh_cookie().is_none());
}

#[tokio::test]
async fn test_refresh_cookie_rotates_when_access_is_invalid() {
    let app = TestApp::new().await;
    app.create_user("dave", "pw-dave-1").await;
    let (_, refresh) = app.sign_in("dave", "pw-dave-1").await;

    let response = app
        .request(
            "GET",
            "/api/users/me",
            None,
            Credentials {
                access: Some("not-a-token"),
                refresh: Some(&refresh),
            },
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["userId"], "dave");
    assert!(response.access_token().is_some());
    let rotated = response.refresh_cookie().expect("rotated refresh cookie");
    assert_ne!(rotated, refresh);

    // The retired token is refused and cleared.
    let replayed = app
        .request("GET", "/api/users/me", None, Credentials::refresh(&refresh))
        .await;
    assert_eq!(replayed.status, StatusCode::UNAUTHORIZED);
    assert!(replayed.clears_refresh_cookie());

    // The rotated one still works.
    let again = app
        .request("GET", "/api/users/me", None, Credentials::refresh(&rotated))
        .await;
    assert_eq!(again.status, StatusCode::OK);
}

#[tokio::test]
async fn test_garbage_refresh_cookie_is_cleared_on_public_route() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", "/api/health", None, Credentials::refresh("garbage"))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.clears_refresh_cookie());
}

#[tokio::test]
async fn test_sign_out_ends_session() {
    let app = TestApp::new().await;
    app.create_user("erin", "pw-erin-1").await;
    let (access, refresh) = app.sign_in("erin", "pw-erin-1").await;

    let response = app
        .request(
            "POST",
            "/api/users/sign-out",
            None,
            Credentials::access(&access),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.clears_refresh_cookie());

    let after = app
        .request("GET", "/api/users/me", None, Credentials::refresh(&refresh))
        .await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_withdrawn_user_cannot_sign_in() {
    let app = TestApp::new().await;
    app.create_user("frank", "pw-frank-1").await;
    let (access, _) = app.sign_in("frank", "pw-frank-1").await;

    let response = app
        .request(
            "DELETE",
            "/api/users/withdraw",
            None,
            Credentials::access(&access),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let again = app
        .request(
            "POST",
            "/api/users/sign-in",
            Some(json!({ "userId": "frank", "password": "pw-frank-1" })),
            Credentials::default(),
        )
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
    assert_eq!(again.error_code(), Some("SU009"));
}

fn sign_up_request(email: &str) -> Request<Body> {
    let payload = json!({
        "userId": "grace",
        "password": "pw-grace-1",
        "validPassword": "pw-grace-1",
        "email": email,
        "userName": "김은혜",
        "nickname": "gracie",
    });
    multipart_sign_up(&payload)
}

fn multipart_sign_up(payload: &serde_json::Value) -> Request<Body> {
    let payload = payload.to_string();
    let (boundary, body) = multipart_body(&[
        ("request", None, "application/json", payload.as_bytes()),
        ("file", Some("me.png"), "image/png", b"\x89PNG-bytes"),
    ]);

    Request::builder()
        .method("POST")
        .uri("/api/users")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_sign_up_requires_verified_email() {
    let app = TestApp::new().await;

    let response = app.send(sign_up_request("grace@example.com")).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), Some("SU005"));
}

#[tokio::test]
async fn test_sign_up_after_email_verification() {
    let app = TestApp::new().await;
    let email = "grace@example.com";

    let sent = app
        .request(
            "POST",
            &format!("/api/users/send-verification-code?email={email}"),
            None,
            Credentials::default(),
        )
        .await;
    assert_eq!(sent.status, StatusCode::OK);

    let wrong = app
        .request(
            "POST",
            &format!("/api/users/send-verification-code/check?email={email}&code=000000x"),
            None,
            Credentials::default(),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let code = app.mailer.last_code_for(email).expect("code mailed");
    let checked = app
        .request(
            "POST",
            &format!("/api/users/send-verification-code/check?email={email}&code={code}"),
            None,
            Credentials::default(),
        )
        .await;
    assert_eq!(checked.status, StatusCode::OK);

    let response = app.send(sign_up_request(email)).await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    assert_eq!(
        response.body["data"]["profileImageUrl"],
        "https://cdn.test/profile-image/me.png"
    );

    let (access, _) = app.sign_in("grace", "pw-grace-1").await;
    assert!(!access.is_empty());

    // The verification mark is single-use.
    let duplicate = app.send(sign_up_request(email)).await;
    assert_eq!(duplicate.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sign_up_rejects_malformed_fields() {
    let app = TestApp::new().await;

    let response = app
        .send(multipart_sign_up(&json!({
            "userId": "A!",
            "password": "a",
            "validPassword": "a",
            "email": "x@",
            "userName": "Grace",
            "nickname": "1",
            "phoneNumber": "12-34",
        })))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let message = response.body["message"].as_str().unwrap_or_default();
    for field in ["user_id", "password", "email", "user_name", "nickname", "phone_number"] {
        assert!(message.contains(field), "{field} missing from {message}");
    }
    assert!(!app.users.exists_by_user_id("A!").await.unwrap());
}
