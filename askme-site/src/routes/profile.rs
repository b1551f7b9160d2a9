use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;

use askme_shared::errors::AppResult;
use askme_shared::middleware::OptionalAuthUser;
use askme_shared::types::ApiResponse;

use crate::models::Question;
use crate::services::profile_service::{self, ProfileView};
use crate::AppState;

pub async fn profile(
    State(state): State<Arc<AppState>>,
    OptionalAuthUser(viewer): OptionalAuthUser,
    Path(username): Path<String>,
) -> AppResult<Json<ApiResponse<ProfileView>>> {
    let view = profile_service::profile(state.store.as_ref(), &username, viewer.map(|v| v.id))?;
    Ok(Json(ApiResponse::ok(view)))
}

pub async fn questions(State(state): State<Arc<AppState>>) -> AppResult<Json<ApiResponse<Vec<Question>>>> {
    let questions = profile_service::questions(state.store.as_ref())?;
    Ok(Json(ApiResponse::ok(questions)))
}
