//! Domain error types for the relay
//!
//! main.rs is the ONLY module allowed to use anyhow::Result (process boundary).
//! All library code returns Result<T, RelayError>.

use axum::http::StatusCode;
use thiserror::Error;

/// Relay domain errors
///
/// Every variant maps to exactly one inbound HTTP status via
/// [`RelayError::status_code`], so handlers never inspect message strings.
///
/// ```text
/// RelayError::GatewayRejected { status: 403 }
/// → "ntfy returned status code 403" → 500 to Owncast
/// ```
#[derive(Error, Debug)]
pub enum RelayError {
    /// Configuration error (environment variable missing or invalid)
    #[error("configuration error: {0}")]
    Config(String),

    /// Owncast sent an event type we have no translation for
    #[error("unknown owncast event type '{event_type}'")]
    UnrecognizedEventType { event_type: String },

    /// NAME_CHANGE event without any previous display name
    #[error("NAME_CHANGE event for '{new_name}' has no previous names")]
    MissingPreviousName { new_name: String },

    /// Chat body could not be rendered as plain text
    #[error("failed to convert chat body to plain text")]
    HtmlConversion(#[source] html2text::Error),

    /// Notification could not be encoded as JSON
    #[error("notification serialization failed")]
    Serialization(#[source] serde_json::Error),

    /// Network-level failure talking to ntfy (connect, TLS, timeout)
    #[error("ntfy request to '{url}' failed")]
    GatewayUnreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// ntfy answered with something other than 200
    #[error("ntfy returned status code {status}")]
    GatewayRejected { status: u16 },

    /// Outbound HTTP client could not be constructed
    #[error("failed to build ntfy HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    /// Prometheus recorder could not be installed
    #[error("metrics recorder installation failed: {0}")]
    Metrics(String),
}

impl RelayError {
    /// Returns a static label string suitable for Prometheus metrics.
    pub fn error_type_label(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::UnrecognizedEventType { .. } => "unrecognized_event",
            Self::MissingPreviousName { .. } => "missing_previous_name",
            Self::HtmlConversion(_) => "html_conversion",
            Self::Serialization(_) => "serialization",
            Self::GatewayUnreachable { .. } => "gateway_unreachable",
            Self::GatewayRejected { .. } => "gateway_rejected",
            Self::ClientBuild(_) => "client_build",
            Self::Metrics(_) => "metrics",
        }
    }

    /// Status code reported back to the Owncast webhook caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UnrecognizedEventType { .. } => StatusCode::NOT_IMPLEMENTED,
            Self::MissingPreviousName { .. } => StatusCode::BAD_REQUEST,
            Self::Config(_)
            | Self::HtmlConversion(_)
            | Self::Serialization(_)
            | Self::GatewayUnreachable { .. }
            | Self::GatewayRejected { .. }
            | Self::ClientBuild(_)
            | Self::Metrics(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short body text reported back to the Owncast webhook caller.
    pub fn response_text(&self) -> &'static str {
        match self {
            Self::UnrecognizedEventType { .. } => "Unknown Owncast Message",
            Self::MissingPreviousName { .. } => "Owncast event is missing required data",
            _ => "Error sending notification",
        }
    }
}
