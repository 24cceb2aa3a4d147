//! ntfy notifications
//!
//! Translation of Owncast events into ntfy messages, and their delivery.

mod forward;
mod translate;

pub use forward::{NtfyForwarder, USER_AGENT};
pub use translate::{translate, Formatting};

use serde::Serialize;

/// JSON body published to ntfy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub topic: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Emoji shortcodes and labels; ntfy turns known shortcodes into icons
    pub tags: Vec<String>,
}
