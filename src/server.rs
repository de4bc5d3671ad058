//! Server bootstrap: build shared state from config and serve the router.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::auth::TokenIssuer;
use crate::config::AppConfig;
use crate::error::Result;
use crate::http::{self, AppState};
use crate::mail::SmtpNotifier;
use crate::store::LibSqlBackend;

/// Open the database (migrating it) and wire the production collaborators.
pub async fn build_state(config: &AppConfig) -> Result<AppState> {
    let db = LibSqlBackend::new_local(&config.database_path).await?;
    Ok(AppState::new(
        Arc::new(db),
        TokenIssuer::from_config(&config.token),
        Arc::new(SmtpNotifier::new(config.mail.clone())),
    ))
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn run(config: AppConfig) -> Result<()> {
    let state = build_state(&config).await?;
    let listener = TcpListener::bind(config.bind).await?;
    serve(listener, http::app(state)).await
}

/// Serve `app` on an already-bound listener until Ctrl-C.
pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    let addr: SocketAddr = listener.local_addr()?;
    info!(%addr, "Galaxy API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Galaxy API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
