// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account registration and session routes.

use axum::{
    extract::State,
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_COOKIE};
use crate::models::User;
use crate::AppState;

use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};

static PBKDF2_ALG: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;
const PBKDF2_ITERATIONS: NonZeroU32 = NonZeroU32::new(100_000).unwrap();
const SALT_LEN: usize = 16;
const CREDENTIAL_LEN: usize = ring::digest::SHA256_OUTPUT_LEN;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", get(logout))
}

// ─── Password Hashing ────────────────────────────────────────

/// Derive a salted PBKDF2-HMAC-SHA256 hash, encoded as
/// `pbkdf2-sha256$<iterations>$<salt_hex>$<hash_hex>`.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt)
        .map_err(|_| anyhow::anyhow!("Failed to generate password salt"))?;

    let mut derived = [0u8; CREDENTIAL_LEN];
    pbkdf2::derive(
        PBKDF2_ALG,
        PBKDF2_ITERATIONS,
        &salt,
        password.as_bytes(),
        &mut derived,
    );

    Ok(format!(
        "pbkdf2-sha256${}${}${}",
        PBKDF2_ITERATIONS,
        hex::encode(salt),
        hex::encode(derived)
    ))
}

/// Check a password against a stored hash. Verification is constant-time
/// inside ring; any parse failure simply fails the check.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let parts: Vec<&str> = stored.split('$').collect();
    if parts.len() != 4 || parts[0] != "pbkdf2-sha256" {
        return false;
    }
    let Some(iterations) = parts[1].parse::<u32>().ok().and_then(NonZeroU32::new) else {
        return false;
    };
    let Ok(salt) = hex::decode(parts[2]) else {
        return false;
    };
    let Ok(expected) = hex::decode(parts[3]) else {
        return false;
    };

    pbkdf2::verify(PBKDF2_ALG, iterations, &salt, password.as_bytes(), &expected).is_ok()
}

// ─── Session Routes ──────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct RegisterPayload {
    #[validate(length(min = 3, max = 64, message = "must be 3-64 characters"))]
    pub username: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

/// Slice of the account safe to echo back on session routes.
#[derive(Serialize)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub message: String,
    pub user: SessionUser,
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Create an account and open a session.
async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<RegisterPayload>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    payload.validate().map_err(AppError::from_validation)?;

    if state
        .db
        .get_user_by_username(&payload.username)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest(
            "Please use a different username".to_string(),
        ));
    }
    if state.db.get_user_by_email(&payload.email).await?.is_some() {
        return Err(AppError::BadRequest(
            "Please use a different email address".to_string(),
        ));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = state
        .db
        .create_user(&payload.username, &payload.email, &password_hash)
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    let jwt = create_jwt(user.id, &state.config.jwt_signing_key)?;
    Ok((
        jar.add(session_cookie(jwt)),
        Json(SessionResponse {
            message: "Congratulations, you are now a registered user!".to_string(),
            user: user.into(),
        }),
    ))
}

/// Verify credentials and open a session.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<LoginPayload>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let user = state.db.get_user_by_username(&payload.username).await?;

    // One failure path for a missing user and a wrong password.
    let Some(user) = user.filter(|u| verify_password(&payload.password, &u.password_hash)) else {
        tracing::debug!(username = %payload.username, "Failed login");
        return Err(AppError::Unauthorized);
    };

    tracing::info!(user_id = user.id, username = %user.username, "User logged in");

    let jwt = create_jwt(user.id, &state.config.jwt_signing_key)?;
    Ok((
        jar.add(session_cookie(jwt)),
        Json(SessionResponse {
            message: "Welcome back!".to_string(),
            user: user.into(),
        }),
    ))
}

/// Close the session by expiring the cookie.
async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    let cookie = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    (jar.remove(cookie), Redirect::temporary("/"))
}
