//! HTTP service
//!
//! A thin axum shim around [`MaskingPipeline`]: request parsing, the call
//! into the pipeline and response serialization. Masking is CPU-bound and
//! runs on the blocking pool; the router enforces a request timeout.

pub mod error;
pub mod routes;

pub use error::ApiError;

use crate::config::ServerConfig;
use crate::domain::{Result, VeilError};
use crate::pipeline::MaskingPipeline;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<MaskingPipeline>,
    pub max_text_chars: usize,
}

impl AppState {
    pub fn new(pipeline: Arc<MaskingPipeline>, max_text_chars: usize) -> Self {
        Self {
            pipeline,
            max_text_chars,
        }
    }
}

/// Build the application router
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route("/mask", post(routes::mask_form))
        .route("/api/mask", post(routes::mask_json))
        .layer(TraceLayer::new_for_http())
        .layer(timeout_layer(request_timeout))
        .with_state(state)
}

/// Requests still running after `request_timeout` get `408 Request Timeout`
fn timeout_layer(request_timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout)
}

/// Bind and serve until `shutdown` flips to `true`
pub async fn serve(
    config: &ServerConfig,
    pipeline: Arc<MaskingPipeline>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let state = AppState::new(pipeline, config.max_text_chars);
    let app = build_router(state, Duration::from_secs(config.request_timeout_seconds));

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| VeilError::Server(format!("Failed to bind {address}: {e}")))?;

    tracing::info!(address = %address, "Veil listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.wait_for(|stop| *stop).await;
            tracing::info!("Shutting down HTTP server");
        })
        .await
        .map_err(|e| VeilError::Server(e.to_string()))?;

    Ok(())
}
