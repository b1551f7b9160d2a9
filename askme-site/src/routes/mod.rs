use std::sync::Arc;

use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use askme_shared::middleware::metrics_middleware;

use crate::AppState;

pub mod answer;
pub mod browse;
pub mod health;
pub mod login;
pub mod logout;
pub mod profile;
pub mod register;
pub mod settings;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(browse::browse))
        .route("/browse", get(browse::browse))
        .route("/login", post(login::login))
        .route("/logout", post(logout::logout))
        .route("/register", post(register::register))
        .route("/user/:username", get(profile::profile))
        .route("/questions", get(profile::questions))
        .route("/answer/:question_id", get(answer::view_answer).post(answer::submit_answer))
        .route("/settings", get(settings::menu))
        .route("/settings/preferences", get(settings::preferences).post(settings::save_preference))
        .route("/settings/user", get(settings::user_settings).post(settings::save_user_settings))
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics))
        .layer(middleware::from_fn_with_state(state.clone(), crate::middleware::touch_last_seen))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
