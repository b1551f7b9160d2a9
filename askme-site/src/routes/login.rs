use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use askme_shared::errors::AppResult;
use askme_shared::types::auth::SessionToken;
use askme_shared::types::{ApiResponse, Redirect};

use crate::forms::LoginForm;
use crate::services::{auth_service, session_service};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub redirect: Redirect,
    pub session: SessionToken,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(form): Json<LoginForm>,
) -> AppResult<Response> {
    let user = auth_service::authenticate(state.store.as_ref(), &form)?;

    let session = session_service::issue_session(user.id, form.remember_me, &state.config)?;
    let cookie = session_service::session_cookie(&session, state.config.secure_cookies)?;

    let body = ApiResponse::ok_with_message(
        LoginResponse { redirect: Redirect::to("/browse"), session },
        format!("Welcome back, {}!", user.username),
    );
    Ok(([(header::SET_COOKIE, cookie)], Json(body)).into_response())
}
