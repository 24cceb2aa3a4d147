//! Inbound Owncast webhook events
//!
//! Provides the typed shape of the JSON bodies Owncast POSTs to the relay.

pub mod owncast;

pub use owncast::{EventData, EventKind, OwncastEvent, OwncastUser};
