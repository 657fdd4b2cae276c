// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gamification routes: the coin balance view, the shop, likes and the
//! advertisement landing page.
//!
//! A purchase is a conditional spend followed by a redirect to the
//! item's fixed external URL — fulfilment is just that link, there is
//! no delivery contract behind it.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::services::{Reward, SpendOutcome};
use crate::AppState;

/// Where the ad landing page sends every visitor.
pub const AD_LANDING_URL: &str = "https://mcdonalds.ru/";

/// Fixed shop catalog: price in coins and the external fulfilment URL.
pub const SHOP_ITEMS: [ShopItem; 3] = [
    ShopItem {
        slug: "shop_1",
        title: "Brain-training subscription",
        price: 10,
        url: "https://wikium.ru/",
    },
    ShopItem {
        slug: "shop_2",
        title: "Online course bundle",
        price: 50,
        url: "https://cutt.ly/OyX5vBz",
    },
    ShopItem {
        slug: "shop_3",
        title: "Creative workshop access",
        price: 50,
        url: "https://videoforme.ru/",
    },
];

pub struct ShopItem {
    pub slug: &'static str,
    pub title: &'static str,
    pub price: i64,
    pub url: &'static str,
}

/// Routes behind the auth wall.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/coins", get(coins).post(coins))
        .route("/shop", get(shop).post(shop))
        .route("/shop_1", get(buy_shop_1).post(buy_shop_1))
        .route("/shop_2", get(buy_shop_2).post(buy_shop_2))
        .route("/shop_3", get(buy_shop_3).post(buy_shop_3))
        .route("/like", get(like).post(like))
}

/// The ad landing page also serves anonymous visitors; it gets the
/// optional-auth layer in the router instead.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/reclama", get(ad_landing).post(ad_landing))
}

// ─── Balance & Catalog Views ─────────────────────────────────

#[derive(Serialize)]
pub struct CoinsResponse {
    /// Display label for the balance (deployment-configurable)
    pub label: String,
    pub balance: i64,
}

async fn coins(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<CoinsResponse>> {
    let balance = state.coins.balance(user.user_id).await?;
    Ok(Json(CoinsResponse {
        label: state.config.coin_label.clone(),
        balance,
    }))
}

#[derive(Serialize)]
pub struct ShopItemView {
    pub slug: &'static str,
    pub title: &'static str,
    pub price: i64,
}

#[derive(Serialize)]
pub struct ShopResponse {
    pub items: Vec<ShopItemView>,
    pub balance: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn shop_response(balance: i64, message: Option<String>) -> ShopResponse {
    ShopResponse {
        items: SHOP_ITEMS
            .iter()
            .map(|item| ShopItemView {
                slug: item.slug,
                title: item.title,
                price: item.price,
            })
            .collect(),
        balance,
        message,
    }
}

async fn shop(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ShopResponse>> {
    let balance = state.coins.balance(user.user_id).await?;
    Ok(Json(shop_response(balance, None)))
}

// ─── Purchases ───────────────────────────────────────────────

/// Spend the item's price and redirect to its external URL; with an
/// insufficient balance the shop view is redisplayed with a message and
/// the balance untouched.
async fn purchase(state: &AppState, user: &AuthUser, item: &ShopItem) -> Result<Response> {
    match state.coins.spend(user.user_id, item.price).await? {
        SpendOutcome::Spent(balance) => {
            tracing::info!(
                user_id = user.user_id,
                item = item.slug,
                price = item.price,
                balance,
                "Shop purchase"
            );
            Ok(Redirect::temporary(item.url).into_response())
        }
        SpendOutcome::InsufficientBalance(balance) => Ok(Json(shop_response(
            balance,
            Some("Unfortunately, you do not have enough coins.".to_string()),
        ))
        .into_response()),
    }
}

async fn buy_shop_1(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response> {
    purchase(&state, &user, &SHOP_ITEMS[0]).await
}

async fn buy_shop_2(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response> {
    purchase(&state, &user, &SHOP_ITEMS[1]).await
}

async fn buy_shop_3(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response> {
    purchase(&state, &user, &SHOP_ITEMS[2]).await
}

// ─── Likes & Ads ─────────────────────────────────────────────

#[derive(Serialize)]
pub struct LikeResponse {
    pub message: String,
    pub balance: i64,
}

/// A like credits one coin.
async fn like(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<LikeResponse>> {
    let balance = state.coins.award(user.user_id, Reward::Like).await?;
    Ok(Json(LikeResponse {
        message: "Thanks for the like!".to_string(),
        balance,
    }))
}

/// Ad landing: reward authenticated visitors, then send everyone to the
/// advertiser.
async fn ad_landing(
    State(state): State<Arc<AppState>>,
    Extension(MaybeAuthUser(user)): Extension<MaybeAuthUser>,
) -> Result<Redirect> {
    if let Some(user) = user {
        state.coins.award(user.user_id, Reward::AdVisit).await?;
    }
    Ok(Redirect::temporary(AD_LANDING_URL))
}
