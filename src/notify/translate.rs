//! Owncast event → ntfy notification mapping

use super::Notification;
use crate::error::RelayError;
use crate::events::{EventKind, OwncastEvent};
use html2text::render::text_renderer::TrivialDecorator;

/// Wide enough that chat lines are never re-wrapped.
const CHAT_RENDER_WIDTH: usize = 10_000;

/// How emphasised values (names, titles) are rendered in message text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Formatting {
    #[default]
    Plain,
    Markdown,
}

impl Formatting {
    pub fn from_markdown_flag(markdown: bool) -> Self {
        if markdown {
            Self::Markdown
        } else {
            Self::Plain
        }
    }

    fn emphasis(self, value: &str) -> String {
        match self {
            Self::Plain => value.to_string(),
            Self::Markdown => format!("**{value}**"),
        }
    }
}

/// Build the notification for one Owncast event.
///
/// Fails with [`RelayError::UnrecognizedEventType`] for tags without a
/// translation, and with [`RelayError::MissingPreviousName`] for a
/// `NAME_CHANGE` that carries no previous names.
pub fn translate(
    event: &OwncastEvent,
    topic: &str,
    formatting: Formatting,
) -> Result<Notification, RelayError> {
    let data = &event.event_data;
    let em = |value: &str| formatting.emphasis(value);

    let (message, title, tags) = match &event.kind {
        EventKind::Chat => (
            html_to_text(&data.body)?,
            Some(format!("{} said", data.user.display_name)),
            ["speech_balloon", "message"],
        ),
        EventKind::NameChange => {
            let previous = data.user.previous_names.last().ok_or_else(|| {
                RelayError::MissingPreviousName {
                    new_name: data.new_name.clone(),
                }
            })?;
            (
                format!("{} changed its name to {}", em(previous), em(&data.new_name)),
                None,
                ["label", "name_change"],
            )
        }
        EventKind::UserJoined => (
            format!("{} joined stream", em(&data.user.display_name)),
            None,
            ["sunglasses", "user_join"],
        ),
        EventKind::UserParted => (
            format!("{} left stream", em(&data.user.display_name)),
            None,
            ["dash", "user_leave"],
        ),
        EventKind::StreamStarted => (
            format!("{} started streaming", em(&data.stream_title)),
            None,
            ["green_circle", "stream_start"],
        ),
        EventKind::StreamStopped => (
            format!("{} stopped streaming", em(&data.stream_title)),
            None,
            ["x", "stream_stop"],
        ),
        EventKind::StreamTitleUpdated => (
            format!("Stream title updated to {}", em(&data.stream_title)),
            None,
            ["new", "stream_title_update"],
        ),
        EventKind::Unrecognized(tag) => {
            return Err(RelayError::UnrecognizedEventType {
                event_type: tag.clone(),
            })
        }
    };

    Ok(Notification {
        topic: topic.to_string(),
        message,
        title,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    })
}

/// Render chat HTML as undecorated plain text.
fn html_to_text(body: &str) -> Result<String, RelayError> {
    let text = html2text::config::with_decorator(TrivialDecorator::new())
        .string_from_read(body.as_bytes(), CHAT_RENDER_WIDTH)
        .map_err(RelayError::HtmlConversion)?;
    Ok(text.trim().to_string())
}
