// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! KnowLand API Server
//!
//! Serves the social learning platform: posts and feeds, the follow
//! graph, search, and the coin gamification loop.

use knowland::{
    config::Config,
    db::Db,
    services::{CoinLedger, FeedService, SocialService, Translator},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting KnowLand API");

    // Open the database and apply migrations
    let db = Db::connect(&config.database_url)
        .await
        .expect("Failed to open database");
    db.migrate().await.expect("Failed to run migrations");
    tracing::info!("Database migrated");

    // Wire up services over the shared database handle
    let feeds = FeedService::new(db.clone());
    let social = SocialService::new(db.clone());
    let coins = CoinLedger::new(db.clone());
    let translator = Translator::new(
        config.translate_api_url.clone(),
        config.translate_api_key.clone(),
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        feeds,
        social,
        coins,
        translator,
    });

    // Build router
    let app = knowland::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("knowland=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
