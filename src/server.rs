//! Server initialization and routing
//!
//! This module handles the Axum server setup including:
//! - Router configuration with all API endpoints
//! - Middleware stack (logging, timeouts, CORS)
//! - Graceful shutdown handling

use crate::config::ServerConfig;
use crate::metrics::{set_run_metrics, RunMetrics};
use crate::middleware::{log_requests, request_id};
use crate::routes::{api_info, health, matching, not_found};
use crate::state::ServerState;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the Axum router with all routes and middleware
///
/// Routes are divided into:
/// - Public routes: /, /health, /ready
/// - The trigger route: POST /api/v1/match/run
///
/// Authentication is intentionally absent: the trigger boundary is assumed
/// to be access-controlled by the host environment.
pub fn build_router(state: Arc<ServerState>) -> Router {
    // CORS layer. Preflight and method negotiation are transport detail the
    // browser-facing host needs; the engine never sees any of it.
    let cors = if state.config.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route("/", get(api_info))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/api/v1/match/run", post(matching::run_matching))
        .fallback(not_found)
        .layer(TimeoutLayer::new(Duration::from_secs(
            state.config.timeout_secs,
        )))
        .layer(cors)
        .layer(from_fn(request_id))
        .layer(from_fn(log_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run metrics recorder that reports through the tracing pipeline.
struct TracingRunMetrics;

impl RunMetrics for TracingRunMetrics {
    fn record_run(&self, latency: Duration, pairs_scored: usize, matches_found: usize) {
        tracing::info!(
            latency_ms = %latency.as_millis(),
            pairs_scored,
            matches_found,
            "matching run metrics"
        );
    }
}

/// Start the refind HTTP server
///
/// Initializes logging and shared state, builds the router, binds the
/// configured TCP address, and serves until SIGTERM or Ctrl+C.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .with_target(false)
        .json()
        .init();

    set_run_metrics(Some(Arc::new(TracingRunMetrics)));

    // Create server state
    let state = Arc::new(ServerState::new(config.clone())?);

    // Build router
    let app = build_router(state);

    // Parse bind address
    let addr: SocketAddr = config.socket_addr()?;

    tracing::info!(
        "Starting refind server on {} (store: {})",
        addr,
        config.store_path.as_deref().unwrap_or("in-memory")
    );
    tracing::info!("Timeout: {}s, CORS: {}", config.timeout_secs, config.enable_cors);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
