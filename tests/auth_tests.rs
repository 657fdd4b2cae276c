// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration, login and session enforcement.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_register_sets_session_cookie() {
    let (app, _state) = common::create_test_app().await;

    let response = app
        .oneshot(common::post_json(
            "/auth/register",
            None,
            json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "a long password",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("register should set a session cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("knowland_token="));
    assert!(cookie.contains("HttpOnly"));

    let body = common::body_json(response).await;
    assert_eq!(body["user"]["username"], "alice");
    // password material never leaves the server
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_session_cookie_authenticates_requests() {
    let (app, _state) = common::create_test_app().await;

    let response = app
        .clone()
        .oneshot(common::post_json(
            "/auth/register",
            None,
            json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "a long password",
            }),
        ))
        .await
        .unwrap();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let cookie_pair = set_cookie.split(';').next().unwrap().to_string();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/")
                .header(header::COOKIE, cookie_pair)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_round_trip() {
    let (app, _state) = common::create_test_app().await;

    app.clone()
        .oneshot(common::post_json(
            "/auth/register",
            None,
            json!({
                "username": "bob",
                "email": "bob@example.com",
                "password": "hunter2hunter2",
            }),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(common::post_json(
            "/auth/login",
            None,
            json!({"username": "bob", "password": "hunter2hunter2"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["message"], "Welcome back!");

    let response = app
        .oneshot(common::post_json(
            "/auth/login",
            None,
            json!({"username": "bob", "password": "wrong"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_rejects_taken_username() {
    let (app, state) = common::create_test_app().await;
    common::seed_user(&state, "taken").await;

    let response = app
        .oneshot(common::post_json(
            "/auth/register",
            None,
            json!({
                "username": "taken",
                "email": "new@example.com",
                "password": "a long password",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["details"], "Please use a different username");
}

#[tokio::test]
async fn test_register_validates_payload() {
    let (app, _state) = common::create_test_app().await;

    let response = app
        .oneshot(common::post_json(
            "/auth/register",
            None,
            json!({
                "username": "x",
                "email": "not-an-email",
                "password": "short",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_protected_routes_require_auth() {
    let (app, _state) = common::create_test_app().await;

    for uri in ["/", "/explore", "/coins", "/shop", "/follow/anyone", "/study"] {
        let response = app.clone().oneshot(common::get(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "route {}", uri);
    }
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let (app, _state) = common::create_test_app().await;

    let response = app
        .oneshot(common::get("/", Some("not-a-jwt")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_is_public() {
    let (app, _state) = common::create_test_app().await;

    let response = app.oneshot(common::get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_authenticated_request_stamps_last_seen() {
    let (app, state) = common::create_test_app().await;
    let user = common::seed_user(&state, "visitor").await;
    let token = common::create_test_jwt(user.id, &state.config.jwt_signing_key);
    assert!(user.last_seen.is_none());

    app.oneshot(common::get("/", Some(&token))).await.unwrap();

    let refreshed = state.db.get_user_by_id(user.id).await.unwrap().unwrap();
    assert!(refreshed.last_seen.is_some());
}
