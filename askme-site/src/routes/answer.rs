use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;

use askme_shared::errors::AppResult;
use askme_shared::types::auth::AuthUser;
use askme_shared::types::{ApiResponse, Redirect};

use crate::forms::AnswerForm;
use crate::services::answer_service::{self, AnswerView};
use crate::AppState;

pub async fn view_answer(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(question_id): Path<i32>,
) -> AppResult<Json<ApiResponse<AnswerView>>> {
    let view = answer_service::view_answer(state.store.as_ref(), user.id, question_id)?;
    Ok(Json(ApiResponse::ok(view)))
}

pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(question_id): Path<i32>,
    Json(form): Json<AnswerForm>,
) -> AppResult<Json<ApiResponse<Redirect>>> {
    let outcome = answer_service::submit_answer(state.store.as_ref(), user.id, question_id, &form)?;
    Ok(Json(ApiResponse::redirect(format!("/answer/{question_id}"), outcome.flash())))
}
