// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SQLite access layer with typed operations.
//!
//! Provides high-level operations for:
//! - Users (accounts, profiles, last-seen stamps)
//! - Posts (composition, feeds, full-text search)
//! - Follows (the directed social graph)
//! - Coins (atomic balance mutation)
//!
//! All SQL lives here; handlers and services only see model structs.

use crate::error::AppError;
use crate::models::{FollowStats, Post, PostWithAuthor, User};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

const MAX_CONNECTIONS: u32 = 5;

/// Columns of a feed row, shared by every feed/search query.
const POST_WITH_AUTHOR_COLUMNS: &str =
    "p.id, p.user_id, u.username AS author, p.body, p.timestamp, p.language";

/// SQLite database handle.
#[derive(Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Open (or create) the database at `url` and build the pool.
    pub async fn connect(url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| AppError::Database(format!("Invalid database URL: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true);

        // An in-memory SQLite database exists per connection, so the pool
        // must stay at a single connection to see one database.
        let max_connections = if url.contains(":memory:") {
            1
        } else {
            MAX_CONNECTIONS
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        tracing::info!(url, "Connected to SQLite");

        Ok(Self { pool })
    }

    /// Apply the versioned migration scripts embedded from `migrations/`.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {}", e)))?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Create an account. Callers check username/email availability first.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email, password_hash) VALUES (?1, ?2, ?3) \
             RETURNING id, username, email, password_hash, about_me, last_seen, coins",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, about_me, last_seen, coins \
             FROM users WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, about_me, last_seen, coins \
             FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, about_me, last_seen, coins \
             FROM users WHERE email = ?1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Update the editable profile fields.
    pub async fn update_profile(
        &self,
        id: i64,
        username: &str,
        about_me: Option<&str>,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET username = ?1, about_me = ?2 WHERE id = ?3 \
             RETURNING id, username, email, password_hash, about_me, last_seen, coins",
        )
        .bind(username)
        .bind(about_me)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    /// Stamp the user's last-seen time.
    pub async fn touch_last_seen(&self, id: i64, when: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET last_seen = ?1 WHERE id = ?2")
            .bind(when)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ─── Follow Operations ───────────────────────────────────────

    /// Create a follow edge. Idempotent: an existing edge is left alone.
    /// Returns whether a new edge was inserted.
    pub async fn insert_follow(&self, follower_id: i64, followed_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO followers (follower_id, followed_id) VALUES (?1, ?2)",
        )
        .bind(follower_id)
        .bind(followed_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a follow edge. Removing a missing edge is a no-op.
    /// Returns whether an edge was deleted.
    pub async fn delete_follow(&self, follower_id: i64, followed_id: i64) -> Result<bool, AppError> {
        let result =
            sqlx::query("DELETE FROM followers WHERE follower_id = ?1 AND followed_id = ?2")
                .bind(follower_id)
                .bind(followed_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn is_following(&self, follower_id: i64, followed_id: i64) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS (SELECT 1 FROM followers WHERE follower_id = ?1 AND followed_id = ?2)",
        )
        .bind(follower_id)
        .bind(followed_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists != 0)
    }

    pub async fn follow_stats(&self, user_id: i64) -> Result<FollowStats, AppError> {
        let followers = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM followers WHERE followed_id = ?1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        let following = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM followers WHERE follower_id = ?1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(FollowStats {
            followers,
            following,
        })
    }

    // ─── Post Operations ─────────────────────────────────────────

    /// Insert a post and credit the composition reward to its author,
    /// both inside one transaction. Returns the post and the new balance.
    pub async fn create_post_with_reward(
        &self,
        author_id: i64,
        body: &str,
        language: &str,
        reward: i64,
    ) -> Result<(Post, i64), AppError> {
        let mut tx = self.pool.begin().await?;

        let post = sqlx::query_as::<_, Post>(
            "INSERT INTO posts (user_id, body, timestamp, language) VALUES (?1, ?2, ?3, ?4) \
             RETURNING id, user_id, body, timestamp, language",
        )
        .bind(author_id)
        .bind(body)
        .bind(Utc::now())
        .bind(language)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE users SET coins = COALESCE(coins, 0) + ?1 WHERE id = ?2")
            .bind(reward)
            .bind(author_id)
            .execute(&mut *tx)
            .await?;

        let balance = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(coins, 0) FROM users WHERE id = ?1",
        )
        .bind(author_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((post, balance))
    }

    /// Posts by `user_id` or anyone they follow, newest first.
    pub async fn followed_posts(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostWithAuthor>, AppError> {
        let posts = sqlx::query_as::<_, PostWithAuthor>(&format!(
            "SELECT {POST_WITH_AUTHOR_COLUMNS} \
             FROM posts p JOIN users u ON u.id = p.user_id \
             WHERE p.user_id = ?1 \
                OR p.user_id IN (SELECT followed_id FROM followers WHERE follower_id = ?1) \
             ORDER BY p.timestamp DESC, p.id DESC \
             LIMIT ?2 OFFSET ?3",
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }

    pub async fn count_followed_posts(&self, user_id: i64) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM posts p \
             WHERE p.user_id = ?1 \
                OR p.user_id IN (SELECT followed_id FROM followers WHERE follower_id = ?1)",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    /// Every post, newest first.
    pub async fn all_posts(&self, limit: i64, offset: i64) -> Result<Vec<PostWithAuthor>, AppError> {
        let posts = sqlx::query_as::<_, PostWithAuthor>(&format!(
            "SELECT {POST_WITH_AUTHOR_COLUMNS} \
             FROM posts p JOIN users u ON u.id = p.user_id \
             ORDER BY p.timestamp DESC, p.id DESC \
             LIMIT ?1 OFFSET ?2",
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }

    pub async fn count_all_posts(&self) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    /// Posts authored by one user, newest first.
    pub async fn posts_by_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostWithAuthor>, AppError> {
        let posts = sqlx::query_as::<_, PostWithAuthor>(&format!(
            "SELECT {POST_WITH_AUTHOR_COLUMNS} \
             FROM posts p JOIN users u ON u.id = p.user_id \
             WHERE p.user_id = ?1 \
             ORDER BY p.timestamp DESC, p.id DESC \
             LIMIT ?2 OFFSET ?3",
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }

    pub async fn count_posts_by_user(&self, user_id: i64) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE user_id = ?1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    /// Full-text search over post bodies. `match_expr` is an already
    /// sanitized FTS5 expression; results rank best match first.
    pub async fn search_posts(
        &self,
        match_expr: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostWithAuthor>, AppError> {
        let posts = sqlx::query_as::<_, PostWithAuthor>(&format!(
            "SELECT {POST_WITH_AUTHOR_COLUMNS} \
             FROM posts_fts f \
             JOIN posts p ON p.id = f.rowid \
             JOIN users u ON u.id = p.user_id \
             WHERE posts_fts MATCH ?1 \
             ORDER BY bm25(posts_fts), p.id DESC \
             LIMIT ?2 OFFSET ?3",
        ))
        .bind(match_expr)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }

    pub async fn count_search_posts(&self, match_expr: &str) -> Result<i64, AppError> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts_fts WHERE posts_fts MATCH ?1")
                .bind(match_expr)
                .fetch_one(&self.pool)
                .await?;
        Ok(total)
    }

    // ─── Coin Operations ─────────────────────────────────────────

    /// Credit `amount` coins. An unset balance initializes to `amount`.
    /// Single UPDATE, so concurrent awards cannot lose increments.
    pub async fn award_coins(&self, user_id: i64, amount: i64) -> Result<i64, AppError> {
        sqlx::query("UPDATE users SET coins = COALESCE(coins, 0) + ?1 WHERE id = ?2")
            .bind(amount)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        self.get_balance(user_id).await
    }

    /// Debit `price` coins if the balance covers it. The guard rides in
    /// the UPDATE itself: zero rows affected means insufficient funds
    /// (a NULL balance never satisfies `coins >= price`).
    /// Returns the new balance, or None when the balance was untouched.
    pub async fn spend_coins(&self, user_id: i64, price: i64) -> Result<Option<i64>, AppError> {
        let result =
            sqlx::query("UPDATE users SET coins = coins - ?1 WHERE id = ?2 AND coins >= ?1")
                .bind(price)
                .bind(user_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(self.get_balance(user_id).await?))
    }

    pub async fn get_balance(&self, user_id: i64) -> Result<i64, AppError> {
        let balance =
            sqlx::query_scalar::<_, i64>("SELECT COALESCE(coins, 0) FROM users WHERE id = ?1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(balance)
    }
}
