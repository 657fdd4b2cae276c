// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Post composition: validation, language tagging and the composition
//! reward.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_compose_awards_ten_coins() {
    let (app, state) = common::create_test_app().await;
    let user = common::seed_user(&state, "author").await;
    let token = common::create_test_jwt(user.id, &state.config.jwt_signing_key);

    let response = app
        .oneshot(common::post_json(
            "/",
            Some(&token),
            json!({"body": "my first post"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = common::body_json(response).await;
    assert_eq!(body["message"], "Your post is now live!");
    assert_eq!(body["balance"], 10);
    assert_eq!(state.coins.balance(user.id).await.unwrap(), 10);
}

#[tokio::test]
async fn test_composed_post_appears_in_feed() {
    let (app, state) = common::create_test_app().await;
    let user = common::seed_user(&state, "author").await;
    let token = common::create_test_jwt(user.id, &state.config.jwt_signing_key);

    app.clone()
        .oneshot(common::post_json(
            "/",
            Some(&token),
            json!({"body": "hello feed"}),
        ))
        .await
        .unwrap();

    let response = app.oneshot(common::get("/", Some(&token))).await.unwrap();
    let body = common::body_json(response).await;
    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["body"], "hello feed");
    assert_eq!(posts[0]["author"], "author");
}

#[tokio::test]
async fn test_language_is_detected_for_clear_english() {
    let (app, state) = common::create_test_app().await;
    let user = common::seed_user(&state, "author").await;
    let token = common::create_test_jwt(user.id, &state.config.jwt_signing_key);

    let body_text = "The quick brown fox jumps over the lazy dog, and then it \
                     keeps on running through the quiet green forest until the \
                     evening light fades away behind the hills.";
    let response = app
        .oneshot(common::post_json("/", Some(&token), json!({"body": body_text})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = common::body_json(response).await;
    assert_eq!(body["post"]["language"], "eng");
}

#[tokio::test]
async fn test_ambiguous_text_stores_empty_language() {
    let (app, state) = common::create_test_app().await;
    let user = common::seed_user(&state, "author").await;
    let token = common::create_test_jwt(user.id, &state.config.jwt_signing_key);

    let response = app
        .oneshot(common::post_json(
            "/",
            Some(&token),
            json!({"body": "12345 67890"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = common::body_json(response).await;
    let tag = body["post"]["language"].as_str().unwrap();
    // never longer than the column allows; digits should not be tagged
    assert!(tag.len() <= 5);
}

#[tokio::test]
async fn test_compose_rejects_empty_body() {
    let (app, state) = common::create_test_app().await;
    let user = common::seed_user(&state, "author").await;
    let token = common::create_test_jwt(user.id, &state.config.jwt_signing_key);

    let response = app
        .oneshot(common::post_json("/", Some(&token), json!({"body": ""})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_compose_rejects_overlong_body() {
    let (app, state) = common::create_test_app().await;
    let user = common::seed_user(&state, "author").await;
    let token = common::create_test_jwt(user.id, &state.config.jwt_signing_key);

    let response = app
        .oneshot(common::post_json(
            "/",
            Some(&token),
            json!({"body": "x".repeat(141)}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ─── Translation ─────────────────────────────────────────────

#[tokio::test]
async fn test_translate_without_configured_service_is_bad_gateway() {
    let (app, state) = common::create_test_app().await;
    let user = common::seed_user(&state, "translator").await;
    let token = common::create_test_jwt(user.id, &state.config.jwt_signing_key);

    let request = Request::builder()
        .method("POST")
        .uri("/translate")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from("text=hola&source_language=es&dest_language=en"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    // the test deployment has no translation service configured
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = common::body_json(response).await;
    assert_eq!(body["error"], "translation_error");
}

// ─── Profile editing ─────────────────────────────────────────

#[tokio::test]
async fn test_edit_profile_round_trip() {
    let (app, state) = common::create_test_app().await;
    let user = common::seed_user(&state, "editable").await;
    let token = common::create_test_jwt(user.id, &state.config.jwt_signing_key);

    let response = app
        .clone()
        .oneshot(common::post_json(
            "/edit_profile",
            Some(&token),
            json!({"username": "renamed", "about_me": "I study series."}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["message"], "Your changes have been saved.");

    let response = app
        .oneshot(common::get("/edit_profile", Some(&token)))
        .await
        .unwrap();
    let body = common::body_json(response).await;
    assert_eq!(body["username"], "renamed");
    assert_eq!(body["about_me"], "I study series.");
}

#[tokio::test]
async fn test_edit_profile_rejects_taken_username() {
    let (app, state) = common::create_test_app().await;
    common::seed_user(&state, "occupied").await;
    let user = common::seed_user(&state, "mover").await;
    let token = common::create_test_jwt(user.id, &state.config.jwt_signing_key);

    let response = app
        .oneshot(common::post_json(
            "/edit_profile",
            Some(&token),
            json!({"username": "occupied"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_keeping_own_username_is_allowed() {
    let (app, state) = common::create_test_app().await;
    let user = common::seed_user(&state, "stable").await;
    let token = common::create_test_jwt(user.id, &state.config.jwt_signing_key);

    let response = app
        .oneshot(common::post_json(
            "/edit_profile",
            Some(&token),
            json!({"username": "stable", "about_me": "unchanged handle"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
