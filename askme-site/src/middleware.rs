use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;

use askme_shared::middleware::OptionalAuthUser;

use crate::AppState;

/// Stamps `last_seen` for every request that carries a valid session.
pub async fn touch_last_seen(
    State(state): State<Arc<AppState>>,
    OptionalAuthUser(user): OptionalAuthUser,
    request: Request,
    next: Next,
) -> Response {
    if let Some(user) = user {
        if let Err(e) = state.store.touch_last_seen(user.id, Utc::now()) {
            tracing::warn!(user_id = user.id, error = %e, "failed to update last_seen");
        }
    }
    next.run(request).await
}
