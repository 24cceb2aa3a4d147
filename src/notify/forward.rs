//! ntfy publisher
//!
//! Posts translated notifications to the ntfy server. One client is shared by
//! every request; there is no retry and no timeout beyond reqwest's defaults.

use super::Notification;
use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::metrics::RelayMetrics;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Identifies the relay to ntfy
pub const USER_AGENT: &str = concat!("owncast-ntfy/", env!("CARGO_PKG_VERSION"));

/// Publishes notifications to one ntfy server
#[derive(Clone)]
pub struct NtfyForwarder {
    client: Client,
    server_url: String,
    /// Precomputed `Basic <base64>` header value
    authorization: Option<String>,
    metrics: RelayMetrics,
}

impl NtfyForwarder {
    /// Build the shared client from relay configuration
    pub fn new(config: &RelayConfig, metrics: RelayMetrics) -> Result<Self, RelayError> {
        let mut builder = Client::builder().user_agent(USER_AGENT);

        if config.allow_insecure {
            warn!("TLS certificate verification towards ntfy is disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(RelayError::ClientBuild)?;

        Ok(Self {
            client,
            server_url: config.ntfy.server_url.clone(),
            authorization: config.basic_auth.as_deref().map(basic_auth_header),
            metrics,
        })
    }

    /// Publish one notification; anything but HTTP 200 is a failure.
    pub async fn forward(&self, notification: &Notification) -> Result<(), RelayError> {
        let start = Instant::now();
        let result = self.send(notification).await;

        match &result {
            Ok(()) => {
                self.metrics.record_forward_success(start.elapsed());
                info!(topic = %notification.topic, "Notification sent to ntfy");
            }
            Err(e) => {
                self.metrics.record_forward_failure(e);
                warn!(topic = %notification.topic, error = %e, "Failed to send notification to ntfy");
            }
        }

        result
    }

    async fn send(&self, notification: &Notification) -> Result<(), RelayError> {
        let payload = serde_json::to_vec(notification).map_err(RelayError::Serialization)?;

        debug!(
            server_url = %self.server_url,
            payload = %String::from_utf8_lossy(&payload),
            "Sending notification to ntfy"
        );

        let mut request = self
            .client
            .post(&self.server_url)
            .header(CONTENT_TYPE, "application/json")
            .header("Markdown", "yes")
            .body(payload);

        if let Some(ref authorization) = self.authorization {
            request = request.header(AUTHORIZATION, authorization);
        }

        let response = request
            .send()
            .await
            .map_err(|source| RelayError::GatewayUnreachable {
                url: self.server_url.clone(),
                source,
            })?;

        if response.status() != StatusCode::OK {
            return Err(RelayError::GatewayRejected {
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }
}

fn basic_auth_header(credential: &str) -> String {
    format!("Basic {}", STANDARD.encode(credential))
}
