//! Prometheus metrics module

use crate::error::RelayError;
use crate::events::EventKind;
use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use std::time::Duration;

/// The global recorder can only be installed once per process.
static RECORDER: OnceCell<Result<PrometheusHandle, String>> = OnceCell::new();

/// Relay metrics collector
#[derive(Clone)]
pub struct RelayMetrics {
    handle: PrometheusHandle,
}

impl RelayMetrics {
    /// Install the Prometheus recorder (first call) and return a handle to it
    pub fn new() -> Result<Self, RelayError> {
        let installed = RECORDER.get_or_init(|| {
            let handle = PrometheusBuilder::new()
                .install_recorder()
                .map_err(|e| e.to_string())?;
            Self::register_metrics();
            Ok(handle)
        });

        match installed {
            Ok(handle) => Ok(Self {
                handle: handle.clone(),
            }),
            Err(e) => Err(RelayError::Metrics(e.clone())),
        }
    }

    /// Register metric descriptions
    fn register_metrics() {
        describe_counter!(
            "relay_events_received_total",
            Unit::Count,
            "Total webhook events received from Owncast"
        );
        describe_counter!(
            "relay_events_rejected_total",
            Unit::Count,
            "Webhook events that could not be translated"
        );
        describe_counter!(
            "relay_notifications_sent_total",
            Unit::Count,
            "Notifications accepted by ntfy"
        );
        describe_counter!(
            "relay_notification_failures_total",
            Unit::Count,
            "Notifications ntfy did not accept"
        );

        describe_histogram!(
            "relay_notification_duration_seconds",
            Unit::Seconds,
            "Time to deliver a notification to ntfy"
        );
    }

    /// Record an event received
    pub fn record_event(&self, kind: &EventKind) {
        counter!(
            "relay_events_received_total",
            "event_type" => kind.metric_label()
        )
        .increment(1);
    }

    /// Record an event dropped before delivery
    pub fn record_rejected(&self, error: &RelayError) {
        counter!(
            "relay_events_rejected_total",
            "error_type" => error.error_type_label()
        )
        .increment(1);
    }

    /// Record successful delivery to ntfy
    pub fn record_forward_success(&self, duration: Duration) {
        counter!("relay_notifications_sent_total").increment(1);
        histogram!("relay_notification_duration_seconds").record(duration.as_secs_f64());
    }

    /// Record failed delivery
    pub fn record_forward_failure(&self, error: &RelayError) {
        counter!(
            "relay_notification_failures_total",
            "error_type" => error.error_type_label()
        )
        .increment(1);
    }

    /// Render metrics in Prometheus format
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_is_shared_between_instances() {
        let first = RelayMetrics::new().unwrap();
        let second = RelayMetrics::new().unwrap();

        first.record_event(&EventKind::UserJoined);
        second.record_rejected(&RelayError::GatewayRejected { status: 500 });

        let rendered = second.render();
        assert!(rendered.contains("relay_events_received_total"));
        assert!(rendered.contains("user_joined"));
        assert!(first.render().contains("relay_events_rejected_total"));
    }
}
