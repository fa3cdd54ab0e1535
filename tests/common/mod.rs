#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use finanzas_core::adapters::MemoryStore;
use finanzas_core::config::Config;
use finanzas_core::domain::User;
use finanzas_core::ports::UserRepository;
use finanzas_core::security::token;
use finanzas_core::{create_app, AppState};

pub const TEST_SECRET: &str = "secreto-de-prueba";

pub fn test_config() -> Config {
    Config {
        server_port: 0,
        database_url: String::new(),
        token_secret: TEST_SECRET.to_string(),
        token_ttl_hours: 1,
        cors_allowed_origins: None,
    }
}

pub fn test_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let state = AppState {
        users: store.clone(),
        entries: store.clone(),
        goals: store.clone(),
        config: Arc::new(test_config()),
    };
    (create_app(state), store)
}

/// Inserts a user straight into the store and returns its id plus a valid
/// session token, skipping the register/login round trip.
pub async fn seed_user(store: &MemoryStore, username: &str) -> (Uuid, String) {
    let user = User::new(
        username.to_string(),
        format!("{username}@test.com"),
        "hash".to_string(),
    );
    let user = UserRepository::insert(store, &user).await.unwrap();
    let session = token::issue(user.id, TEST_SECRET, 1).unwrap();
    (user.id, session)
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    session: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let (status, _, bytes) = send_full(app, method, uri, session, body).await;
    (status, bytes)
}

pub async fn send_full(
    app: &Router,
    method: &str,
    uri: &str,
    session: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(session) = session {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {session}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = hyper::body::to_bytes(response.into_body())
        .await
        .unwrap()
        .to_vec();
    (status, headers, bytes)
}

pub fn json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}
