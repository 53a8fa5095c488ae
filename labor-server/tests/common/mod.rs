//! Shared helpers for the API integration tests
//!
//! Each test builds an isolated in-memory database and drives the full
//! router (auth middleware included) with `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::Router;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use labor_server::auth::jwt::JwtConfig;
use labor_server::{api, Config, ServerState};

pub const ADMIN_PASSWORD: &str = "bootstrap-admin-password";

/// Build a router plus its state over a fresh in-memory database
pub async fn test_app() -> (Router, ServerState) {
    let config = Config {
        http_port: 0,
        database_path: ":memory:".into(),
        jwt: JwtConfig::with_secret("integration-test-secret-0123456789").unwrap(),
        admin_password: Some(ADMIN_PASSWORD.into()),
        environment: "test".into(),
        log_dir: None,
    };
    let state = ServerState::initialize(config)
        .await
        .expect("state initialization");
    (api::router(state.clone()), state)
}

/// Send a JSON request and return `(status, parsed body)`
///
/// An empty body parses as `Value::Null`.
pub async fn request(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(value) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

/// Send a request and return the raw response (non-JSON bodies, headers)
pub async fn request_raw(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
) -> http::Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Log in and return the token
pub async fn login(app: &Router, name: &str, password: &str) -> String {
    let (status, body) = request(
        app,
        Method::POST,
        "/worker/login",
        None,
        Some(json!({"name": name, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

/// Log in as the seeded bootstrap admin
pub async fn admin_token(app: &Router) -> String {
    login(app, "Admin", ADMIN_PASSWORD).await
}

/// Create a worker through the API, returning its id
pub async fn create_worker(
    app: &Router,
    admin_token: &str,
    soft_one_id: &str,
    name: &str,
    password: &str,
) -> i64 {
    let (status, body) = request(
        app,
        Method::POST,
        "/worker",
        Some(admin_token),
        Some(json!({
            "soft_one_id": soft_one_id,
            "name": name,
            "password": password,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "worker creation failed: {body}");
    body["id"].as_i64().unwrap()
}
