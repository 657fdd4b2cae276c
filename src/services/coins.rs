// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Coin ledger: fixed rewards for learning activity, spends for the shop.
//!
//! The balance is the only state — there is no transaction log. Both
//! directions are single conditional UPDATEs at the storage layer, so
//! racing requests cannot read-modify-write each other's balance away.

use crate::db::Db;
use crate::error::AppError;

/// Fixed reward amounts per qualifying activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reward {
    /// Working through a lesson page
    Lesson,
    /// Passing the self-check test
    TestPassed,
    /// Composing a post
    PostComposed,
    /// A "like" action
    Like,
    /// Visiting the advertisement landing page
    AdVisit,
}

impl Reward {
    pub fn amount(self) -> i64 {
        match self {
            Reward::Lesson => 1,
            Reward::TestPassed => 5,
            Reward::PostComposed => 10,
            Reward::Like => 1,
            Reward::AdVisit => 2,
        }
    }
}

/// Result of a spend attempt. Either way the caller learns the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpendOutcome {
    /// Balance covered the price and was decremented.
    Spent(i64),
    /// Balance was below the price and is untouched.
    InsufficientBalance(i64),
}

/// Coin balance operations over the storage layer.
#[derive(Clone)]
pub struct CoinLedger {
    db: Db,
}

impl CoinLedger {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Credit the fixed reward for an activity. An account that has never
    /// earned a coin initializes at the reward amount.
    pub async fn award(&self, user_id: i64, reward: Reward) -> Result<i64, AppError> {
        let balance = self.db.award_coins(user_id, reward.amount()).await?;
        tracing::debug!(user_id, reward = ?reward, balance, "Coins awarded");
        Ok(balance)
    }

    /// Debit `price` if the balance covers it; otherwise leave the balance
    /// untouched and report it.
    pub async fn spend(&self, user_id: i64, price: i64) -> Result<SpendOutcome, AppError> {
        match self.db.spend_coins(user_id, price).await? {
            Some(balance) => {
                tracing::info!(user_id, price, balance, "Coins spent");
                Ok(SpendOutcome::Spent(balance))
            }
            None => {
                let balance = self.db.get_balance(user_id).await?;
                tracing::debug!(user_id, price, balance, "Insufficient balance");
                Ok(SpendOutcome::InsufficientBalance(balance))
            }
        }
    }

    pub async fn balance(&self, user_id: i64) -> Result<i64, AppError> {
        self.db.get_balance(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reward_amounts() {
        assert_eq!(Reward::Lesson.amount(), 1);
        assert_eq!(Reward::TestPassed.amount(), 5);
        assert_eq!(Reward::PostComposed.amount(), 10);
        assert_eq!(Reward::Like.amount(), 1);
        assert_eq!(Reward::AdVisit.amount(), 2);
    }
}
