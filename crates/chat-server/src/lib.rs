//! HTTP API for the chat core (Axum).
//!
//! Session CRUD, context merges, history export, and reply streaming over
//! Server-Sent Events.

pub mod error;
pub mod logging;
pub mod routes;
pub mod state;
pub mod sweeper;

use axum::Router;
use chat_core::AppConfig;
use state::AppState;
use std::time::Duration;

/// Build the application router with default configuration.
pub fn app() -> Router {
    let state = AppState::new(AppConfig::default());
    app_with_state(state)
}

/// Build the application router with a custom state.
pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::session_routes())
        .with_state(state)
}

/// Bind, serve until Ctrl-C, then stop the sweeper.
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config);

    let sweeper = state.config.sessions.idle_ttl_secs.map(|ttl| {
        sweeper::spawn_idle_sweeper(
            state.chat.store().clone(),
            Duration::from_secs(ttl),
            Duration::from_secs(state.config.sessions.sweep_interval_secs),
        )
    });

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, backend = state.chat.backend_name(), "chat server listening");

    axum::serve(listener, app_with_state(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "failed to listen for shutdown signal");
            }
        })
        .await?;

    if let Some(handle) = sweeper {
        handle.abort();
    }
    tracing::info!("chat server stopped");
    Ok(())
}
