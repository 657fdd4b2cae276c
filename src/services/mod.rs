// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod coins;
pub mod feed;
pub mod language;
pub mod social;
pub mod translate;

pub use coins::{CoinLedger, Reward, SpendOutcome};
pub use feed::FeedService;
pub use social::{FollowOutcome, SocialService};
pub use translate::Translator;
