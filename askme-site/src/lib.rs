use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use askme_shared::middleware::SessionSecret;

pub mod config;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod schema;
pub mod services;
pub mod store;

use config::AppConfig;
use store::EntityStore;

pub struct AppState {
    pub store: Arc<dyn EntityStore>,
    pub config: AppConfig,
    pub metrics_handle: Option<PrometheusHandle>,
}

impl SessionSecret for AppState {
    fn session_secret(&self) -> &str {
        &self.config.session_secret
    }
}
