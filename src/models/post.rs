// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Post model for storage and API.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A short post authored by a user.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    /// Authoring user
    pub user_id: i64,
    pub body: String,
    /// Creation time; feeds order by this, descending
    pub timestamp: DateTime<Utc>,
    /// Best-effort detected language tag; empty when detection was
    /// unknown or implausible
    pub language: String,
}

/// Post joined with its author's username, as feeds return it.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PostWithAuthor {
    pub id: i64,
    pub user_id: i64,
    pub author: String,
    pub body: String,
    pub timestamp: DateTime<Utc>,
    pub language: String,
}
