use axum::extract::State;
use axum::Json;
use std::sync::Arc;

use askme_shared::errors::AppResult;
use askme_shared::types::{ApiResponse, Redirect};

use crate::forms::RegistrationForm;
use crate::services::auth_service;
use crate::AppState;

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(form): Json<RegistrationForm>,
) -> AppResult<Json<ApiResponse<Redirect>>> {
    auth_service::register(state.store.as_ref(), &form)?;
    Ok(Json(ApiResponse::redirect(
        "/login",
        "Congratulations, you are now a registered user!",
    )))
}
