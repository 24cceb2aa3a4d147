//! Webhook, health and metrics endpoints

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::events::OwncastEvent;
use crate::metrics::RelayMetrics;
use crate::notify::{translate, Formatting, NtfyForwarder};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub topic: String,
}

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub forwarder: NtfyForwarder,
    pub metrics: RelayMetrics,
}

impl AppState {
    /// Wire up forwarder and metrics for the given configuration
    pub fn new(config: RelayConfig) -> Result<Self, RelayError> {
        let metrics = RelayMetrics::new()?;
        let forwarder = NtfyForwarder::new(&config, metrics.clone())?;
        Ok(Self {
            config: Arc::new(config),
            forwarder,
            metrics,
        })
    }
}

/// Create the relay router
///
/// Non-POST requests to `/` are answered with 405.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(webhook_handler).fallback(method_not_allowed))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Owncast webhook endpoint
async fn webhook_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> impl IntoResponse {
    let body = match body {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "Failed to read webhook body");
            return (StatusCode::BAD_REQUEST, "Error reading request body").into_response();
        }
    };

    let event: OwncastEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "Failed to parse webhook payload");
            return (StatusCode::BAD_REQUEST, "Error parsing JSON payload").into_response();
        }
    };

    state.metrics.record_event(&event.kind);
    debug!(event_type = event.kind.as_str(), "Webhook event received");

    let formatting = Formatting::from_markdown_flag(state.config.markdown);
    let notification = match translate(&event, &state.config.ntfy.topic, formatting) {
        Ok(notification) => notification,
        Err(e) => {
            warn!(event_type = event.kind.as_str(), error = %e, "Event not forwarded");
            state.metrics.record_rejected(&e);
            return (e.status_code(), e.response_text()).into_response();
        }
    };

    if let Err(e) = state.forwarder.forward(&notification).await {
        return (e.status_code(), e.response_text()).into_response();
    }

    info!(event_type = event.kind.as_str(), "Event relayed");
    (StatusCode::OK, "Payload received successfully\n").into_response()
}

async fn method_not_allowed() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, "Invalid request method")
}

/// Health endpoint - always returns 200 if process is running
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        topic: state.config.ntfy.topic.clone(),
    })
}

/// Metrics endpoint - returns Prometheus format metrics
async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        state.metrics.render(),
    )
}
