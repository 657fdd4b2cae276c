// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Timeline routes: feeds, the post composer, profiles, search and
//! translation.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Extension, Form, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Post, PostWithAuthor};
use crate::pagination::Page;
use crate::services::{language, Reward};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index).post(compose_post))
        .route("/index", get(index).post(compose_post))
        .route("/explore", get(explore))
        .route("/user/{username}", get(user_page))
        .route("/edit_profile", get(edit_profile_form).post(edit_profile))
        .route("/search", get(search))
        .route("/translate", post(translate_text))
}

// ─── Shared View Models ──────────────────────────────────────

#[derive(Serialize)]
pub struct PostView {
    pub id: i64,
    pub author: String,
    pub body: String,
    pub timestamp: DateTime<Utc>,
    pub language: String,
}

impl From<PostWithAuthor> for PostView {
    fn from(post: PostWithAuthor) -> Self {
        Self {
            id: post.id,
            author: post.author,
            body: post.body,
            timestamp: post.timestamp,
            language: post.language,
        }
    }
}

/// One feed page plus the links a client pages with.
#[derive(Serialize)]
pub struct FeedResponse {
    pub posts: Vec<PostView>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
    pub next_url: Option<String>,
    pub prev_url: Option<String>,
}

impl FeedResponse {
    /// Build the response, deriving next/prev URLs from `base` (which may
    /// already carry a query string, e.g. `/search?q=…`).
    fn build(window: Page<PostWithAuthor>, base: &str) -> Self {
        let sep = if base.contains('?') { '&' } else { '?' };
        let next_url = window.next_page().map(|p| format!("{}{}page={}", base, sep, p));
        let prev_url = window.prev_page().map(|p| format!("{}{}page={}", base, sep, p));
        Self {
            posts: window.items.into_iter().map(PostView::from).collect(),
            page: window.page,
            per_page: window.per_page,
            total: window.total,
            next_url,
            prev_url,
        }
    }
}

#[derive(Deserialize)]
pub struct FeedQuery {
    #[serde(default = "default_page")]
    page: u32,
}

fn default_page() -> u32 {
    1
}

fn check_page(page: u32) -> Result<()> {
    if page < 1 {
        return Err(AppError::BadRequest(
            "Page must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

// ─── Feeds ───────────────────────────────────────────────────

/// Followed feed: the user's own posts and those of everyone they follow.
async fn index(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<FeedQuery>,
) -> Result<Json<FeedResponse>> {
    check_page(params.page)?;
    let window = state
        .feeds
        .followed_feed(user.user_id, params.page, state.config.posts_per_page)
        .await?;
    Ok(Json(FeedResponse::build(window, "/")))
}

/// Global feed: every post, newest first.
async fn explore(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<AuthUser>,
    Query(params): Query<FeedQuery>,
) -> Result<Json<FeedResponse>> {
    check_page(params.page)?;
    let window = state
        .feeds
        .global_feed(params.page, state.config.posts_per_page)
        .await?;
    Ok(Json(FeedResponse::build(window, "/explore")))
}

// ─── Post Composer ───────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct PostPayload {
    #[validate(length(min = 1, max = 140, message = "must be 1-140 characters"))]
    pub body: String,
}

#[derive(Serialize)]
pub struct ComposeResponse {
    pub message: String,
    pub post: Post,
    /// Coin balance after the composition reward
    pub balance: i64,
}

/// Compose a post: guess its language, store it and credit the reward,
/// all in one transaction.
async fn compose_post(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<PostPayload>,
) -> Result<(StatusCode, Json<ComposeResponse>)> {
    payload.validate().map_err(AppError::from_validation)?;

    let detected = language::detect(&payload.body);
    let (post, balance) = state
        .db
        .create_post_with_reward(
            user.user_id,
            &payload.body,
            &detected,
            Reward::PostComposed.amount(),
        )
        .await?;

    tracing::info!(
        user_id = user.user_id,
        post_id = post.id,
        language = %post.language,
        "Post published"
    );

    Ok((
        StatusCode::CREATED,
        Json(ComposeResponse {
            message: "Your post is now live!".to_string(),
            post,
            balance,
        }),
    ))
}

// ─── Profiles ────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ProfileView {
    pub username: String,
    pub about_me: Option<String>,
    pub last_seen: Option<DateTime<Utc>>,
    pub followers: i64,
    pub following: i64,
    /// Whether the requesting user follows this profile
    pub is_following: bool,
}

#[derive(Serialize)]
pub struct UserPageResponse {
    pub user: ProfileView,
    #[serde(flatten)]
    pub feed: FeedResponse,
}

/// Profile page: the named user's posts, newest first. 404 when the
/// username does not exist.
async fn user_page(
    State(state): State<Arc<AppState>>,
    Extension(viewer): Extension<AuthUser>,
    Path(username): Path<String>,
    Query(params): Query<FeedQuery>,
) -> Result<Json<UserPageResponse>> {
    check_page(params.page)?;
    let (user, window) = state
        .feeds
        .user_feed(&username, params.page, state.config.posts_per_page)
        .await?;
    let stats = state.social.stats(user.id).await?;
    let is_following = state.social.is_following(viewer.user_id, user.id).await?;

    let base = format!("/user/{}", user.username);
    Ok(Json(UserPageResponse {
        user: ProfileView {
            username: user.username,
            about_me: user.about_me,
            last_seen: user.last_seen,
            followers: stats.followers,
            following: stats.following,
            is_following,
        },
        feed: FeedResponse::build(window, &base),
    }))
}

#[derive(Deserialize, Validate)]
pub struct EditProfilePayload {
    #[validate(length(min = 3, max = 64, message = "must be 3-64 characters"))]
    pub username: String,
    #[validate(length(max = 140, message = "must be at most 140 characters"))]
    pub about_me: Option<String>,
}

#[derive(Serialize)]
pub struct EditProfileResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub username: String,
    pub about_me: Option<String>,
}

/// Current values for the profile edit form.
async fn edit_profile_form(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<EditProfileResponse>> {
    let profile = state
        .db
        .get_user_by_id(user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    Ok(Json(EditProfileResponse {
        message: None,
        username: profile.username,
        about_me: profile.about_me,
    }))
}

/// Apply profile edits. A username already taken by someone else is a
/// validation failure, not a silent overwrite.
async fn edit_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<EditProfilePayload>,
) -> Result<Json<EditProfileResponse>> {
    payload.validate().map_err(AppError::from_validation)?;

    if let Some(existing) = state.db.get_user_by_username(&payload.username).await? {
        if existing.id != user.user_id {
            return Err(AppError::BadRequest(
                "Please use a different username".to_string(),
            ));
        }
    }

    let updated = state
        .db
        .update_profile(user.user_id, &payload.username, payload.about_me.as_deref())
        .await?;

    tracing::info!(user_id = user.user_id, username = %updated.username, "Profile updated");

    Ok(Json(EditProfileResponse {
        message: Some("Your changes have been saved.".to_string()),
        username: updated.username,
        about_me: updated.about_me,
    }))
}

// ─── Search ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
    #[serde(default = "default_page")]
    page: u32,
}

/// Full-text search over post bodies. An empty query falls back to the
/// global feed instead of running a search.
async fn search(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<AuthUser>,
    Query(params): Query<SearchQuery>,
) -> Result<Response> {
    check_page(params.page)?;
    let Some(window) = state
        .feeds
        .search(&params.q, params.page, state.config.posts_per_page)
        .await?
    else {
        return Ok(Redirect::temporary("/explore").into_response());
    };

    let base = format!("/search?q={}", urlencoding::encode(params.q.trim()));
    Ok(Json(FeedResponse::build(window, &base)).into_response())
}

// ─── Translation ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct TranslatePayload {
    pub text: String,
    pub source_language: String,
    pub dest_language: String,
}

#[derive(Serialize)]
pub struct TranslatedResponse {
    pub text: String,
}

/// Translate a post body via the outbound translation API.
async fn translate_text(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<AuthUser>,
    Form(payload): Form<TranslatePayload>,
) -> Result<Json<TranslatedResponse>> {
    let text = state
        .translator
        .translate(
            &payload.text,
            &payload.source_language,
            &payload.dest_language,
        )
        .await?;
    Ok(Json(TranslatedResponse { text }))
}
