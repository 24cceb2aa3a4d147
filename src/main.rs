//! owncast-ntfy binary
//!
//! Loads configuration from the environment, then serves the Owncast
//! webhook endpoint until SIGINT/SIGTERM.

use anyhow::Result;
use owncast_ntfy::{router, AppState, RelayConfig};
use std::net::SocketAddr;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first to get log level; a bad NTFY_URL exits here
    let relay_config = RelayConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("owncast_ntfy={}", relay_config.log_level).parse()?)
                .add_directive("hyper=warn".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .json()
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        server_url = %relay_config.ntfy.server_url,
        topic = %relay_config.ntfy.topic,
        basic_auth = relay_config.basic_auth.is_some(),
        allow_insecure = relay_config.allow_insecure,
        markdown = relay_config.markdown,
        "Forwarding Owncast notifications to ntfy"
    );

    let http_port = relay_config.http_port;
    let app = router(AppState::new(relay_config)?);
    let addr: SocketAddr = ([0, 0, 0, 0], http_port).into();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(port = http_port, "Listening for Owncast webhooks");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Relay shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
