//! Owncast webhook payloads
//!
//! Owncast POSTs one JSON object per event. Only the fields the relay renders
//! are modelled; everything else in the payload is ignored.

use serde::{Deserialize, Deserializer};

/// Event type tag sent in the `type` field
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum EventKind {
    Chat,
    NameChange,
    UserJoined,
    UserParted,
    StreamStarted,
    StreamStopped,
    StreamTitleUpdated,
    /// Any tag the relay has no translation for, kept verbatim
    Unrecognized(String),
}

impl From<String> for EventKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "CHAT" => Self::Chat,
            "NAME_CHANGE" => Self::NameChange,
            "USER_JOINED" => Self::UserJoined,
            "USER_PARTED" => Self::UserParted,
            "STREAM_STARTED" => Self::StreamStarted,
            "STREAM_STOPPED" => Self::StreamStopped,
            "STREAM_TITLE_UPDATED" => Self::StreamTitleUpdated,
            _ => Self::Unrecognized(tag),
        }
    }
}

/// A missing or `null` tag is just another tag without a translation.
impl Default for EventKind {
    fn default() -> Self {
        Self::Unrecognized(String::new())
    }
}

impl EventKind {
    /// The wire tag as Owncast sends it
    pub fn as_str(&self) -> &str {
        match self {
            Self::Chat => "CHAT",
            Self::NameChange => "NAME_CHANGE",
            Self::UserJoined => "USER_JOINED",
            Self::UserParted => "USER_PARTED",
            Self::StreamStarted => "STREAM_STARTED",
            Self::StreamStopped => "STREAM_STOPPED",
            Self::StreamTitleUpdated => "STREAM_TITLE_UPDATED",
            Self::Unrecognized(tag) => tag,
        }
    }

    /// Bounded label for metrics; unknown tags collapse into one series.
    pub fn metric_label(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::NameChange => "name_change",
            Self::UserJoined => "user_joined",
            Self::UserParted => "user_parted",
            Self::StreamStarted => "stream_started",
            Self::StreamStopped => "stream_stopped",
            Self::StreamTitleUpdated => "stream_title_updated",
            Self::Unrecognized(_) => "unrecognized",
        }
    }
}

/// One webhook delivery from Owncast
#[derive(Debug, Clone, Deserialize)]
pub struct OwncastEvent {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: EventKind,

    #[serde(
        default,
        rename = "eventData",
        alias = "EventData",
        deserialize_with = "null_as_default"
    )]
    pub event_data: EventData,
}

/// Event-specific fields; which ones are set depends on the event type
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventData {
    /// Chat message body (HTML)
    #[serde(deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(deserialize_with = "null_as_default")]
    pub user: OwncastUser,
    #[serde(deserialize_with = "null_as_default")]
    pub new_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub stream_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OwncastUser {
    #[serde(deserialize_with = "null_as_default")]
    pub display_name: String,
    /// Oldest first; the last entry is the name used right before a change
    #[serde(deserialize_with = "null_names_as_empty")]
    pub previous_names: Vec<String>,
}

/// Owncast is a Go service and sends `null` for nil slices, pointers and
/// structs; treat it like an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_names_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let names = Option::<Vec<Option<String>>>::deserialize(deserializer)?;
    Ok(names
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}
