//! owncast-ntfy - relay Owncast webhooks to ntfy
//!
//! Receives Owncast webhook events, renders each one as a short
//! human-readable notification, and publishes it to an ntfy topic.
//!
//! Requests are independent: configuration is immutable after startup and
//! the only shared resource is the outbound HTTP client.

pub mod config;
pub mod error;
pub mod events;
pub mod metrics;
pub mod notify;
pub mod server;

pub use config::{NtfyTarget, RelayConfig};
pub use error::RelayError;
pub use server::{router, AppState};
