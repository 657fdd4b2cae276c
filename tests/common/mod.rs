// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use knowland::config::Config;
use knowland::db::Db;
use knowland::models::User;
use knowland::routes::create_router;
use knowland::services::{CoinLedger, FeedService, SocialService, Translator};
use knowland::AppState;
use std::sync::Arc;

/// Create a test app over a fresh in-memory database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();

    let db = Db::connect(&config.database_url)
        .await
        .expect("Failed to open in-memory database");
    db.migrate().await.expect("Failed to run migrations");

    let state = Arc::new(AppState {
        feeds: FeedService::new(db.clone()),
        social: SocialService::new(db.clone()),
        coins: CoinLedger::new(db.clone()),
        translator: Translator::new(None, None),
        config,
        db,
    });

    (create_router(state.clone()), state)
}

/// Mint a session token the way the login route would.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: i64, signing_key: &[u8]) -> String {
    knowland::middleware::auth::create_jwt(user_id, signing_key).expect("JWT creation failed")
}

/// Insert an account directly; tests that exercise login go through the
/// register route instead.
#[allow(dead_code)]
pub async fn seed_user(state: &AppState, username: &str) -> User {
    state
        .db
        .create_user(
            username,
            &format!("{}@example.com", username),
            "pbkdf2-sha256$1000$aa$bb",
        )
        .await
        .expect("Failed to seed user")
}

/// GET request with an optional Bearer token.
#[allow(dead_code)]
pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

/// POST request with a JSON body and an optional Bearer token.
#[allow(dead_code)]
pub fn post_json(uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Drain a response body into JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&bytes).expect("Response body was not JSON")
}
