// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Follow/unfollow routes.

use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::services::FollowOutcome;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/follow/{username}", get(follow_user).post(follow_user))
        .route("/unfollow/{username}", get(unfollow_user).post(unfollow_user))
}

/// Outcome of a graph mutation. `following` is absent when nothing
/// could change (missing target, self-target).
#[derive(Serialize)]
pub struct FollowResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub following: Option<bool>,
}

/// Follow the named user. Missing targets and self-follows are
/// message-level no-ops.
async fn follow_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(username): Path<String>,
) -> Result<Json<FollowResponse>> {
    let response = match state.social.follow(user.user_id, &username).await? {
        FollowOutcome::NotFound => FollowResponse {
            message: format!("User {} not found.", username),
            following: None,
        },
        FollowOutcome::SelfTarget => FollowResponse {
            message: "You cannot follow yourself!".to_string(),
            following: None,
        },
        FollowOutcome::Applied { target } => FollowResponse {
            message: format!("You are now following {}!", target.username),
            following: Some(true),
        },
    };
    Ok(Json(response))
}

/// Unfollow the named user; symmetric with `follow_user`.
async fn unfollow_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(username): Path<String>,
) -> Result<Json<FollowResponse>> {
    let response = match state.social.unfollow(user.user_id, &username).await? {
        FollowOutcome::NotFound => FollowResponse {
            message: format!("User {} not found.", username),
            following: None,
        },
        FollowOutcome::SelfTarget => FollowResponse {
            message: "You cannot unfollow yourself.".to_string(),
            following: None,
        },
        FollowOutcome::Applied { target } => FollowResponse {
            message: format!("You are no longer following {}.", target.username),
            following: Some(false),
        },
    };
    Ok(Json(response))
}
