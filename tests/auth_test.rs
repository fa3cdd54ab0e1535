mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use common::{json as parse_json, send, send_full, test_app};

#[tokio::test]
async fn register_login_profile_flow() {
    let (app, _) = test_app();

    let (status, bytes) = send(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({
            "username": "testuser",
            "email": "test@test.com",
            "password": "123456",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let profile = parse_json(&bytes);
    assert_eq!(profile["username"], "testuser");
    assert_eq!(profile["email"], "test@test.com");
    assert!(profile.get("password").is_none());
    assert!(profile.get("createdAt").is_some());

    let (status, headers, _) = send_full(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({ "username": "testuser", "password": "123456" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let cookie = headers[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.starts_with("token="));

    // The session cookie issued at login authenticates follow-up requests.
    let session_cookie = cookie.split(';').next().unwrap().to_string();
    let request = Request::builder()
        .method("GET")
        .uri("/api/profile")
        .header(header::COOKIE, session_cookie)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    assert_eq!(parse_json(&bytes)["username"], "testuser");
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let (app, _) = test_app();

    let payload = json!({
        "username": "testuser",
        "email": "test@test.com",
        "password": "123456",
    });
    let (status, _) = send(&app, "POST", "/api/register", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, bytes) = send(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({
            "username": "otrouser",
            "email": "test@test.com",
            "password": "123456",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let error = parse_json(&bytes);
    assert_eq!(error["error"], "validation");
    assert!(error["messages"][0]
        .as_str()
        .unwrap()
        .contains("correo"));
}

#[tokio::test]
async fn register_collects_every_field_error() {
    let (app, _) = test_app();

    let (status, bytes) = send(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({ "username": "  ", "email": "no-es-correo", "password": "123" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = parse_json(&bytes);
    assert_eq!(error["messages"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let (app, _) = test_app();

    send(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({
            "username": "testuser",
            "email": "test@test.com",
            "password": "123456",
        })),
    )
    .await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({ "username": "testuser", "password": "equivocada" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_rejects_unknown_user() {
    let (app, _) = test_app();

    let (status, _) = send(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({ "username": "nadie", "password": "123456" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn profile_requires_a_token() {
    let (app, _) = test_app();

    let (status, bytes) = send(&app, "GET", "/api/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(parse_json(&bytes)["error"], "unauthorized");
}

#[tokio::test]
async fn forged_token_is_rejected() {
    let (app, _) = test_app();

    let (status, _) = send(
        &app,
        "GET",
        "/api/profile",
        Some("cGF5bG9hZA.0000000000000000000000000000000000000000000000000000000000000000"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_clears_the_cookie() {
    let (app, _) = test_app();

    let (status, headers, _) = send_full(&app, "POST", "/api/logout", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let cookie = headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("token=;"));
    assert!(cookie.contains("Max-Age=0"));
}
