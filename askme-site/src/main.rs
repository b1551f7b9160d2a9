use std::sync::Arc;

use askme_shared::clients::db::create_pool;

use askme_site::config::AppConfig;
use askme_site::store::postgres::{run_migrations, PgStore};
use askme_site::{routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    askme_shared::middleware::init_tracing("askme-site");

    let config = AppConfig::load()?;
    let port = config.port;

    let pool = create_pool(&config.database_url, config.db_pool_size)?;
    if config.run_migrations {
        run_migrations(&pool)?;
    }

    let metrics_handle = match askme_shared::middleware::init_metrics() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "prometheus recorder unavailable, /metrics disabled");
            None
        }
    };

    let state = Arc::new(AppState {
        store: Arc::new(PgStore::new(pool)),
        config,
        metrics_handle,
    });

    let app = routes::router(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "askme-site starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
