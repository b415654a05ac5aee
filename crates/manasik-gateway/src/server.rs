//! HTTP server implementation using Axum.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use manasik_agent::AnswerSynthesizer;
use manasik_core::config::GatewayConfig;
use manasik_core::error::{ManasikError, Result};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state for the gateway server.
///
/// Everything here is read-only after startup, so handlers share it without locks.
pub struct AppState {
    pub synthesizer: Arc<AnswerSynthesizer>,
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(synthesizer: Arc<AnswerSynthesizer>) -> Self {
        Self {
            synthesizer,
            start_time: std::time::Instant::now(),
        }
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState, cors: bool) -> Router {
    let router = Router::new()
        .route("/api/health", get(super::routes::health_check))
        .route("/api/chat", post(super::routes::chat))
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http());

    if cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    }
}

/// Bind `host:port` and serve until the process exits.
pub async fn start_server(config: &GatewayConfig, synthesizer: Arc<AnswerSynthesizer>) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ManasikError::Other(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(
        "🚀 Manasik gateway listening on http://{} ({} documents, model {})",
        addr,
        synthesizer.retriever().len(),
        synthesizer.model()
    );

    let app = build_router(AppState::new(synthesizer), config.cors);
    axum::serve(listener, app).await?;
    Ok(())
}
