// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! KnowLand: a small social learning platform.
//!
//! This crate provides the backend API: short posts and feeds, a follow
//! graph, full-text search, and a coin balance earned through learning
//! activity and spent in the shop.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod services;

use config::Config;
use db::Db;
use services::{CoinLedger, FeedService, SocialService, Translator};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub feeds: FeedService,
    pub social: SocialService,
    pub coins: CoinLedger,
    pub translator: Translator,
}
