use std::sync::Arc;

use anyhow::Context;

use basketdash_api::app::{self, services::AppServices};
use basketdash_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    basketdash_observability::init();

    let config = ApiConfig::from_env().context("invalid configuration")?;

    // A partially loaded table must never be served.
    let services = AppServices::load(&config)
        .with_context(|| format!("failed to load dataset {}", config.dataset_path.display()))?;

    let app = app::build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
}
