use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

use askme_shared::{HealthCheck, HealthResponse, HealthStatus};

use crate::AppState;

/// Health check that probes the database.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Response {
    let database = match state.store.ping() {
        Ok(()) => HealthCheck { name: "database".into(), status: HealthStatus::Healthy, message: None },
        Err(e) => HealthCheck {
            name: "database".into(),
            status: HealthStatus::Unhealthy,
            message: Some(e.to_string()),
        },
    };

    let response = HealthResponse::healthy("askme-site", env!("CARGO_PKG_VERSION")).with_checks(vec![database]);

    let status = match response.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status, Json(response)).into_response()
}

/// Returns Prometheus metrics.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics_handle {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}
