//! Worker API integration tests: login, token handling and CRUD

mod common;

use common::*;
use http::{Method, StatusCode};
use serde_json::json;

use labor_server::auth::jwt::{JwtConfig, JwtService};

#[tokio::test]
async fn login_round_trip_claims_match() {
    let (app, state) = test_app().await;
    let admin = admin_token(&app).await;
    let worker_id = create_worker(&app, &admin, "EXT-1", "maria", "maria-password").await;

    let (status, body) = request(
        &app,
        Method::POST,
        "/worker/login",
        None,
        Some(json!({"name": "maria", "password": "maria-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The returned worker never carries the password hash
    assert_eq!(body["user"]["name"], "maria");
    assert_eq!(body["user"]["admin"], false);
    assert!(body["user"].get("password").is_none());

    // Token claims match the worker
    let claims = state
        .get_jwt_service()
        .validate_token(body["token"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.sub, worker_id.to_string());
    assert!(!claims.admin);
}

#[tokio::test]
async fn login_rejections_are_uniform() {
    let (app, _state) = test_app().await;
    let admin = admin_token(&app).await;
    create_worker(&app, &admin, "EXT-1", "maria", "maria-password").await;

    // Unknown name and wrong password produce the same error
    let (status_a, body_a) = request(
        &app,
        Method::POST,
        "/worker/login",
        None,
        Some(json!({"name": "nobody", "password": "whatever"})),
    )
    .await;
    let (status_b, body_b) = request(
        &app,
        Method::POST,
        "/worker/login",
        None,
        Some(json!({"name": "maria", "password": "wrong"})),
    )
    .await;

    assert_eq!(status_a, StatusCode::UNAUTHORIZED);
    assert_eq!(status_b, StatusCode::UNAUTHORIZED);
    assert_eq!(body_a["code"], body_b["code"]);
    assert_eq!(body_a["message"], body_b["message"]);
}

#[tokio::test]
async fn auth_rejections_are_distinguishable() {
    let (app, _state) = test_app().await;
    let admin = admin_token(&app).await;
    create_worker(&app, &admin, "EXT-1", "maria", "maria-password").await;
    let worker = login(&app, "maria", "maria-password").await;

    // Missing token
    let (status, body) = request(&app, Method::GET, "/picking", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    // Garbage token
    let (status, body) =
        request(&app, Method::GET, "/picking", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1004);

    // Valid token, admin route
    let (status, body) = request(&app, Method::GET, "/worker", Some(&worker), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);
}

#[tokio::test]
async fn expired_token_gets_its_own_rejection() {
    let (app, _state) = test_app().await;

    // Correctly signed token that expired well past the leeway window
    let expired = JwtService::with_config(JwtConfig {
        secret: "integration-test-secret-0123456789".into(),
        expiration_minutes: -5,
        issuer: "labor-server".into(),
        audience: "labor-clients".into(),
    })
    .generate_token(1, "Admin", true)
    .unwrap();

    let (status, body) = request(&app, Method::GET, "/picking", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1003);
}

#[tokio::test]
async fn token_validation_endpoint() {
    let (app, _state) = test_app().await;
    let admin = admin_token(&app).await;

    let (status, body) = request(
        &app,
        Method::GET,
        "/worker/token_validation",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_valid"], true);

    let (status, body) = request(&app, Method::GET, "/worker/token_validation", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_valid"], false);
}

#[tokio::test]
async fn worker_crud_flow() {
    let (app, _state) = test_app().await;
    let admin = admin_token(&app).await;
    let id = create_worker(&app, &admin, "EXT-7", "jonas", "jonas-password").await;

    // Duplicate name rejected
    let (status, body) = request(
        &app,
        Method::POST,
        "/worker",
        Some(&admin),
        Some(json!({"soft_one_id": "EXT-8", "name": "jonas", "password": "x-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");

    // Lookup by id and by external id agree
    let (status, by_id) =
        request(&app, Method::GET, &format!("/worker/{id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, by_ext) = request(
        &app,
        Method::GET,
        "/worker/external/EXT-7",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_id["id"], by_ext["id"]);

    // List includes both workers, hashes stripped
    let (status, list) = request(&app, Method::GET, "/worker", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert!(list.iter().all(|w| w.get("password").is_none()));

    // Rename without touching the password
    let (status, updated) = request(
        &app,
        Method::PUT,
        &format!("/worker/{id}"),
        Some(&admin),
        Some(json!({"name": "jonas-v2"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "jonas-v2");
    login(&app, "jonas-v2", "jonas-password").await;

    // Password change takes effect, old one stops working
    let (status, _) = request(
        &app,
        Method::PUT,
        &format!("/worker/{id}"),
        Some(&admin),
        Some(json!({"name": "jonas-v2", "password": "new-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    login(&app, "jonas-v2", "new-password").await;
    let (status, _) = request(
        &app,
        Method::POST,
        "/worker/login",
        None,
        Some(json!({"name": "jonas-v2", "password": "jonas-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Delete; second delete is NotFound
    let (status, _) = request(
        &app,
        Method::DELETE,
        &format!("/worker/{id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = request(
        &app,
        Method::DELETE,
        &format!("/worker/{id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn token_outlives_worker_deletion() {
    let (app, _state) = test_app().await;
    let admin = admin_token(&app).await;
    let id = create_worker(&app, &admin, "EXT-1", "maria", "maria-password").await;
    let token = login(&app, "maria", "maria-password").await;

    let (status, _) = request(
        &app,
        Method::DELETE,
        &format!("/worker/{id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Verification is stateless: the token stays valid until expiry
    let (status, body) = request(&app, Method::GET, "/picking", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn validation_rejects_blank_fields() {
    let (app, _state) = test_app().await;
    let admin = admin_token(&app).await;

    let (status, body) = request(
        &app,
        Method::POST,
        "/worker",
        Some(&admin),
        Some(json!({"soft_one_id": "EXT-1", "name": "  ", "password": "secret-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
}
