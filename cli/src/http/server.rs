//! HTTP server lifecycle

use std::net::SocketAddr;

use axum::middleware;
use tokio::signal;
use tracing::{info, warn};

use crate::http::{
    middleware::{create_middleware_stack, request_logger},
    routes::create_router,
    AppState,
};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

pub async fn start_server(
    config: ServerConfig,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let router = create_router(state.clone());
    let app = router
        .layer(middleware::from_fn(request_logger))
        .layer(create_middleware_stack());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        target: "finguard.http",
        session_id = %state.session_id,
        degraded = state.degraded,
        "listening on http://{}",
        listener.local_addr()?
    );

    let mut shutdown_rx = state.shutdown_tx.subscribe();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = signal::ctrl_c() => {
                    info!(target: "finguard.http", "received Ctrl+C");
                }
                _ = shutdown_rx.recv() => {
                    info!(target: "finguard.http", "received shutdown request");
                }
                _ = wait_for_sigterm() => {
                    info!(target: "finguard.http", "received SIGTERM");
                }
            }
            info!(target: "finguard.http", "starting graceful shutdown");
        })
        .await?;

    info!(target: "finguard.http", "server shutdown complete");
    Ok(())
}

#[cfg(unix)]
async fn wait_for_sigterm() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            warn!(target: "finguard.http", error = %e, "SIGTERM handler unavailable");
            std::future::pending::<()>().await
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_sigterm() {
    std::future::pending::<()>().await
}
