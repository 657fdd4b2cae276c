//! User model for storage and API.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Account row. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    /// Unique handle shown on posts and profile pages
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Free-form profile text
    pub about_me: Option<String>,
    /// Stamped on every authenticated request
    pub last_seen: Option<DateTime<Utc>>,
    /// Coin balance; NULL means the account has never earned a coin
    pub coins: Option<i64>,
}

impl User {
    /// Current coin balance, treating an unset column as zero.
    pub fn balance(&self) -> i64 {
        self.coins.unwrap_or(0)
    }
}

/// Follower/following counts for a profile page.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FollowStats {
    pub followers: i64,
    pub following: i64,
}
