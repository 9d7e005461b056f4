//! Gateway server setup
//!
//! Provides the WebSocket server configuration and routes.

mod handler;
mod state;

pub use handler::gateway_handler;
pub use state::GatewayState;

use crate::router::EventRouter;
use axum::{routing::get, Router};
use relay_common::{AppConfig, AppError, AppResult, StaticTokenAuthenticator};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Create the gateway router
pub fn create_router(ws_path: &str) -> Router<GatewayState> {
    Router::new()
        .route(ws_path, get(gateway_handler))
        .route("/health", get(health_check))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    create_router(&state.config().relay.ws_path)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Create `GatewayState` with an empty router and the built-in token table
pub fn create_gateway_state(config: AppConfig) -> GatewayState {
    let authenticator = StaticTokenAuthenticator::with_default_tokens();
    tracing::info!(tokens = authenticator.len(), "Static token authenticator ready");

    GatewayState::new(EventRouter::new_shared(), Arc::new(authenticator), config)
}

/// Run the gateway server until Ctrl-C
pub async fn run_server(app: Router, addr: SocketAddr, ws_path: &str) -> AppResult<()> {
    tracing::info!("Starting Gateway server on {}", addr);

    let listener = TcpListener::bind(addr).await.map_err(|source| AppError::Bind {
        addr: addr.to_string(),
        source,
    })?;

    tracing::info!("Gateway listening on ws://{}{}", addr, ws_path);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Server(e.to_string()))?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> AppResult<()> {
    let address = config.gateway.address();
    let addr: SocketAddr = address
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address {address}: {e}")))?;
    let ws_path = config.relay.ws_path.clone();

    let state = create_gateway_state(config);
    let app = create_app(state);

    run_server(app, addr, &ws_path).await
}
