// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication middleware.

use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Session cookie carrying the JWT.
pub const SESSION_COOKIE: &str = "knowland_token";

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated user extracted from JWT.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Present on routes that work with or without a session.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

/// Pull the token from the session cookie, falling back to a Bearer header.
fn token_from_request(jar: &CookieJar, request: &Request) -> Option<String> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;
    auth_header.strip_prefix("Bearer ").map(str::to_string)
}

/// Decode and validate a session token, returning the user ID.
fn decode_user_id(token: &str, signing_key: &[u8]) -> Option<i64> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);
    let token_data = decode::<Claims>(token, &key, &validation).ok()?;
    token_data.claims.sub.parse().ok()
}

/// Middleware that requires valid JWT authentication.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = token_from_request(&jar, &request).ok_or(StatusCode::UNAUTHORIZED)?;
    let user_id = decode_user_id(&token, &state.config.jwt_signing_key)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // Stamp last-seen on every authenticated request. A failed stamp is
    // not worth failing the request over.
    if let Err(e) = state.db.touch_last_seen(user_id, chrono::Utc::now()).await {
        tracing::warn!(user_id, error = %e, "Failed to stamp last_seen");
    }

    request.extensions_mut().insert(AuthUser { user_id });
    Ok(next.run(request).await)
}

/// Middleware for routes that reward a session but accept anonymous
/// visitors (the ad landing page).
pub async fn maybe_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let user = token_from_request(&jar, &request)
        .and_then(|token| decode_user_id(&token, &state.config.jwt_signing_key))
        .map(|user_id| AuthUser { user_id });

    if let Some(auth) = &user {
        if let Err(e) = state
            .db
            .touch_last_seen(auth.user_id, chrono::Utc::now())
            .await
        {
            tracing::warn!(user_id = auth.user_id, error = %e, "Failed to stamp last_seen");
        }
    }

    request.extensions_mut().insert(MaybeAuthUser(user));
    next.run(request).await
}

/// Create a JWT for a user session.
pub fn create_jwt(user_id: i64, signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now,
        exp: now + 30 * 24 * 60 * 60, // 30 days
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}
