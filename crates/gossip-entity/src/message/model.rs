//! Message entity model.

use chrono::{DateTime, Utc};
use gossip_core::types::{ChatId, MessageId, UserId};
use serde::{Deserialize, Serialize};

/// One chat message. Messages are append-only; there is no edit or delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique message identifier.
    pub id: MessageId,
    /// Chat the message belongs to, when the transport reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<ChatId>,
    /// Author.
    #[serde(alias = "senderId", alias = "sender_id")]
    pub user_id: UserId,
    /// Message body.
    pub text: String,
    /// When the message was sent.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message stamped with the current time.
    pub fn new(user_id: UserId, text: impl Into<String>) -> Self {
        Self {
            id: MessageId::generate(),
            chat_id: None,
            user_id,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Attach the chat id.
    pub fn in_chat(mut self, chat_id: ChatId) -> Self {
        self.chat_id = Some(chat_id);
        self
    }
}

/// Body of `POST /api/messages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    /// Target chat.
    pub chat_id: ChatId,
    /// Message body.
    pub text: String,
}
