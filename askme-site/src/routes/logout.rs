use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;

use askme_shared::middleware::OptionalAuthUser;
use askme_shared::types::ApiResponse;

use crate::services::session_service;
use crate::AppState;

pub async fn logout(
    State(state): State<Arc<AppState>>,
    OptionalAuthUser(user): OptionalAuthUser,
) -> impl IntoResponse {
    if let Some(user) = user {
        tracing::info!(user_id = user.id, session_id = %user.session_id, "user logged out");
    }
    let cookie = session_service::clear_session_cookie(state.config.secure_cookies);
    (
        [(header::SET_COOKIE, cookie)],
        Json(ApiResponse::redirect("/browse", "You have been logged out.")),
    )
}
