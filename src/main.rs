use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use domaininfo_api::{
    config::Config,
    metrics,
    resolver::DomainInfoResolver,
    server::{app_router, AppState},
    telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Arc::new(Config::load()?);

    // Flushed on drop, after the server has stopped
    let _log_guard = telemetry::init_tracing(&config)?;
    info!("Configuration loaded successfully");

    let resolver = Arc::new(DomainInfoResolver::from_config(config.clone()));

    let mut state = AppState::new(resolver);
    if let Some(handle) = metrics::init_metrics() {
        state = state.with_metrics(handle);
    }

    let app = app_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server Started");
    info!("DomainInfo API listening on {}", addr);

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install CTRL+C signal handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received shutdown signal, gracefully shutting down...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server stopped");
    Ok(())
}
