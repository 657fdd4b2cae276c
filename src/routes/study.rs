// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Learning routes: lesson pages and the self-check test.
//!
//! Lessons are static content; working through the rewarded ones
//! credits a fixed number of coins per visit.

use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::services::Reward;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/study", get(study).post(study))
        .route("/course_1", get(course_1).post(course_1))
        .route("/integrals", get(integrals).post(integrals))
        .route(
            "/definite_integral",
            get(definite_integral).post(definite_integral),
        )
        .route("/number_series", get(number_series).post(number_series))
        .route("/leibniz", get(leibniz).post(leibniz))
        .route("/test", get(test_page).post(test_page))
        .route("/testgood", get(test_passed).post(test_passed))
        .route("/testbad", get(test_failed).post(test_failed))
}

/// One static lesson page, with an optional coin reward for visiting.
struct Lesson {
    title: &'static str,
    content: &'static str,
    reward: Option<Reward>,
}

const STUDY: Lesson = Lesson {
    title: "Let's get studying",
    content: "Pick a course below to start earning coins for every lesson you work through.",
    reward: None,
};

const COURSE_1: Lesson = Lesson {
    title: "First-year course",
    content: "Calculus fundamentals: integrals, number series and convergence tests.",
    reward: None,
};

const INTEGRALS: Lesson = Lesson {
    title: "Integrals",
    content: "An integral assigns a number to a function in a way that describes \
              accumulation: area, volume, displacement.",
    reward: None,
};

const DEFINITE_INTEGRAL: Lesson = Lesson {
    title: "The definite integral",
    content: "The definite integral of f over [a, b] is the limit of Riemann sums \
              as the partition gets arbitrarily fine.",
    reward: Some(Reward::Lesson),
};

const NUMBER_SERIES: Lesson = Lesson {
    title: "Number series",
    content: "A series converges when its sequence of partial sums has a finite \
              limit; otherwise it diverges.",
    reward: Some(Reward::Lesson),
};

const LEIBNIZ: Lesson = Lesson {
    title: "The Leibniz test",
    content: "An alternating series with terms decreasing in absolute value to \
              zero converges.",
    reward: Some(Reward::Lesson),
};

const TEST: Lesson = Lesson {
    title: "Self-check test",
    content: "Answer the questions, then submit to /testgood or /testbad \
              depending on your score.",
    reward: None,
};

#[derive(Serialize)]
pub struct LessonResponse {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coins_awarded: Option<i64>,
    /// Balance after any award; absent on unrewarded pages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<i64>,
}

/// Render a lesson, crediting its reward when it has one.
async fn lesson_page(
    state: &AppState,
    user: &AuthUser,
    lesson: &Lesson,
    message: Option<&str>,
) -> Result<Json<LessonResponse>> {
    let (coins_awarded, balance) = match lesson.reward {
        Some(reward) => {
            let balance = state.coins.award(user.user_id, reward).await?;
            (Some(reward.amount()), Some(balance))
        }
        None => (None, None),
    };

    Ok(Json(LessonResponse {
        title: lesson.title.to_string(),
        content: lesson.content.to_string(),
        message: message.map(str::to_string),
        coins_awarded,
        balance,
    }))
}

async fn study(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<LessonResponse>> {
    lesson_page(&state, &user, &STUDY, None).await
}

async fn course_1(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<LessonResponse>> {
    lesson_page(&state, &user, &COURSE_1, None).await
}

async fn integrals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<LessonResponse>> {
    lesson_page(&state, &user, &INTEGRALS, None).await
}

async fn definite_integral(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<LessonResponse>> {
    lesson_page(&state, &user, &DEFINITE_INTEGRAL, None).await
}

async fn number_series(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<LessonResponse>> {
    lesson_page(&state, &user, &NUMBER_SERIES, None).await
}

async fn leibniz(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<LessonResponse>> {
    lesson_page(&state, &user, &LEIBNIZ, None).await
}

async fn test_page(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<LessonResponse>> {
    lesson_page(&state, &user, &TEST, None).await
}

/// Passing the test credits the test reward.
async fn test_passed(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<LessonResponse>> {
    let balance = state.coins.award(user.user_id, Reward::TestPassed).await?;
    Ok(Json(LessonResponse {
        title: STUDY.title.to_string(),
        content: STUDY.content.to_string(),
        message: Some("You passed the test!".to_string()),
        coins_awarded: Some(Reward::TestPassed.amount()),
        balance: Some(balance),
    }))
}

/// Failing the test awards nothing.
async fn test_failed() -> Json<LessonResponse> {
    Json(LessonResponse {
        title: STUDY.title.to_string(),
        content: STUDY.content.to_string(),
        message: Some("You failed the test!".to_string()),
        coins_awarded: None,
        balance: None,
    })
}
