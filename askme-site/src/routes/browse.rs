use axum::extract::{Query, State};
use axum::Json;
use std::sync::Arc;

use askme_shared::errors::AppResult;
use askme_shared::middleware::OptionalAuthUser;
use askme_shared::types::{ApiResponse, Paginated, PaginationParams};

use crate::services::profile_service::{self, UserCard};
use crate::AppState;

pub async fn browse(
    State(state): State<Arc<AppState>>,
    OptionalAuthUser(viewer): OptionalAuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<UserCard>>>> {
    let page = profile_service::browse(state.store.as_ref(), viewer.is_some(), &params)?;
    Ok(Json(ApiResponse::ok(page)))
}
