// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Feed and search listings: ordered, paginated post windows.
//!
//! All operations are read-only and take the acting user explicitly.
//! Ordering is always creation time descending; a page past the end is
//! an empty window with no next link, never an error.

use crate::db::Db;
use crate::error::AppError;
use crate::models::{PostWithAuthor, User};
use crate::pagination::{offset, Page};

/// Paginated post listings over the storage layer.
#[derive(Clone)]
pub struct FeedService {
    db: Db,
}

impl FeedService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Posts authored by `user_id` or anyone they follow.
    pub async fn followed_feed(
        &self,
        user_id: i64,
        page: u32,
        per_page: u32,
    ) -> Result<Page<PostWithAuthor>, AppError> {
        let total = self.db.count_followed_posts(user_id).await?;
        let items = self
            .db
            .followed_posts(user_id, i64::from(per_page), offset(page, per_page))
            .await?;
        Ok(Page::new(items, page, per_page, total))
    }

    /// Every post, unfiltered by the social graph.
    pub async fn global_feed(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<Page<PostWithAuthor>, AppError> {
        let total = self.db.count_all_posts().await?;
        let items = self
            .db
            .all_posts(i64::from(per_page), offset(page, per_page))
            .await?;
        Ok(Page::new(items, page, per_page, total))
    }

    /// Posts authored by the named user. NotFound when the username
    /// does not exist.
    pub async fn user_feed(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<(User, Page<PostWithAuthor>), AppError> {
        let user = self
            .db
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", username)))?;

        let total = self.db.count_posts_by_user(user.id).await?;
        let items = self
            .db
            .posts_by_user(user.id, i64::from(per_page), offset(page, per_page))
            .await?;
        Ok((user, Page::new(items, page, per_page, total)))
    }

    /// Full-text search over post bodies. Returns None when the query is
    /// empty after trimming — the caller falls back to the global feed.
    pub async fn search(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Option<Page<PostWithAuthor>>, AppError> {
        let Some(match_expr) = escape_match_query(query) else {
            return Ok(None);
        };

        let total = self.db.count_search_posts(&match_expr).await?;
        let items = self
            .db
            .search_posts(&match_expr, i64::from(per_page), offset(page, per_page))
            .await?;
        tracing::debug!(query, total, page, "Post search");
        Ok(Some(Page::new(items, page, per_page, total)))
    }
}

/// Turn raw user input into a safe FTS5 expression: each whitespace
/// token becomes a quoted phrase (inner quotes doubled), joined with the
/// implicit AND. Returns None for an effectively empty query.
pub fn escape_match_query(query: &str) -> Option<String> {
    let tokens: Vec<String> = query
        .split_whitespace()
        .map(|t| format!("\"{}\"", t.replace('"', "\"\"")))
        .collect();
    if tokens.is_empty() {
        return None;
    }
    Some(tokens.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_plain_words() {
        assert_eq!(
            escape_match_query("hello world"),
            Some("\"hello\" \"world\"".to_string())
        );
    }

    #[test]
    fn test_escape_empty_query() {
        assert_eq!(escape_match_query(""), None);
        assert_eq!(escape_match_query("   "), None);
    }

    #[test]
    fn test_escape_neutralizes_fts_operators() {
        // operators and column filters end up inside phrase quotes
        assert_eq!(
            escape_match_query("body: NEAR(a b)"),
            Some("\"body:\" \"NEAR(a\" \"b)\"".to_string())
        );
        assert_eq!(
            escape_match_query("a\"b"),
            Some("\"a\"\"b\"".to_string())
        );
    }
}
