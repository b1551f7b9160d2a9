use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Records request count and latency labelled by route template, so
/// `/user/alice` and `/user/bob` share the `/user/:username` series.
pub async fn metrics_middleware(
    matched_path: Option<MatchedPath>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = matched_path
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status();
    let outcome = if status.is_server_error() {
        "error"
    } else if status.is_client_error() {
        "rejected"
    } else {
        "ok"
    };

    let labels = [
        ("method", method),
        ("path", path),
        ("status", status.as_u16().to_string()),
        ("outcome", outcome.to_string()),
    ];

    counter!("askme_http_requests_total", &labels).increment(1);
    histogram!("askme_http_request_duration_seconds", &labels).record(duration);

    response
}

/// Installs the global Prometheus recorder. Call once per process.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}
