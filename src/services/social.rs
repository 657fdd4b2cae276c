// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Social graph: follow/unfollow between users.
//!
//! Invariants enforced here rather than in storage: no self-edges, and
//! both operations are idempotent message-level no-ops when the target
//! is missing or already in the requested state.

use crate::db::Db;
use crate::error::AppError;
use crate::models::{FollowStats, User};

/// Result of a follow or unfollow attempt.
#[derive(Debug)]
pub enum FollowOutcome {
    /// The named target does not exist; nothing changed.
    NotFound,
    /// The target is the acting user; nothing changed.
    SelfTarget,
    /// The graph now has (follow) or lacks (unfollow) the edge.
    Applied { target: User },
}

/// Follow-graph operations over the storage layer.
#[derive(Clone)]
pub struct SocialService {
    db: Db,
}

impl SocialService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Follow `target_username` on behalf of `actor_id`. Following an
    /// already-followed user does not duplicate the edge.
    pub async fn follow(
        &self,
        actor_id: i64,
        target_username: &str,
    ) -> Result<FollowOutcome, AppError> {
        let Some(target) = self.db.get_user_by_username(target_username).await? else {
            return Ok(FollowOutcome::NotFound);
        };
        if target.id == actor_id {
            return Ok(FollowOutcome::SelfTarget);
        }

        let inserted = self.db.insert_follow(actor_id, target.id).await?;
        tracing::info!(
            actor_id,
            target = %target.username,
            new_edge = inserted,
            "Follow"
        );
        Ok(FollowOutcome::Applied { target })
    }

    /// Unfollow `target_username`. Removing a non-existent edge is a no-op.
    pub async fn unfollow(
        &self,
        actor_id: i64,
        target_username: &str,
    ) -> Result<FollowOutcome, AppError> {
        let Some(target) = self.db.get_user_by_username(target_username).await? else {
            return Ok(FollowOutcome::NotFound);
        };
        if target.id == actor_id {
            return Ok(FollowOutcome::SelfTarget);
        }

        let removed = self.db.delete_follow(actor_id, target.id).await?;
        tracing::info!(
            actor_id,
            target = %target.username,
            edge_removed = removed,
            "Unfollow"
        );
        Ok(FollowOutcome::Applied { target })
    }

    pub async fn is_following(&self, actor_id: i64, target_id: i64) -> Result<bool, AppError> {
        self.db.is_following(actor_id, target_id).await
    }

    /// Follower/following counts for a profile page.
    pub async fn stats(&self, user_id: i64) -> Result<FollowStats, AppError> {
        self.db.follow_stats(user_id).await
    }
}
