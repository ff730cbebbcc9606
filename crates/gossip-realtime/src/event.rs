//! Presence event types and their wire form.

use std::fmt;

use serde::{Deserialize, Serialize};

use gossip_core::types::UserId;
use gossip_entity::message::Message;

/// The four event kinds a channel reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// The channel became connected.
    #[serde(alias = "CONNECT")]
    Connect,
    /// The channel became disconnected.
    #[serde(alias = "DISCONNECT")]
    Disconnect,
    /// A chat message arrived.
    #[serde(alias = "NEW_MESSAGE")]
    NewMessage,
    /// A user's online flag changed.
    #[serde(alias = "USER_STATUS")]
    UserStatus,
}

impl EventKind {
    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
            Self::NewMessage => "new_message",
            Self::UserStatus => "user_status",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a `USER_STATUS` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatusUpdate {
    /// Whose status changed.
    pub user_id: UserId,
    /// New online flag.
    pub is_online: bool,
}

/// An event delivered to listeners.
///
/// Serialized as `{ "type": "user_status", "data": { ... } }`. The
/// upper-case tags (`USER_STATUS`, ...) are accepted on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum PresenceEvent {
    /// The channel became connected.
    #[serde(alias = "CONNECT")]
    Connect,
    /// The channel became disconnected.
    #[serde(alias = "DISCONNECT")]
    Disconnect,
    /// A chat message arrived.
    #[serde(alias = "NEW_MESSAGE")]
    NewMessage(Message),
    /// A user's online flag changed.
    #[serde(alias = "USER_STATUS")]
    UserStatus(UserStatusUpdate),
}

impl PresenceEvent {
    /// The kind listeners register for.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Connect => EventKind::Connect,
            Self::Disconnect => EventKind::Disconnect,
            Self::NewMessage(_) => EventKind::NewMessage,
            Self::UserStatus(_) => EventKind::UserStatus,
        }
    }

    /// Shorthand for a status event.
    pub fn user_status(user_id: UserId, is_online: bool) -> Self {
        Self::UserStatus(UserStatusUpdate { user_id, is_online })
    }
}
