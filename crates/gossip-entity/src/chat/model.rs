//! Chat summary shown in the chat list.

use chrono::{DateTime, Utc};
use gossip_core::types::{ChatId, UserId};
use serde::{Deserialize, Serialize};

/// One row of the chat list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummary {
    /// Unique chat identifier.
    pub id: ChatId,
    /// Chat title; the other participant's name for direct chats.
    pub name: String,
    /// Preview of the latest message.
    #[serde(default)]
    pub last_message: String,
    /// Time of the latest message.
    pub timestamp: DateTime<Utc>,
    /// Messages not yet read by the current user.
    #[serde(default, alias = "unread")]
    pub unread_count: u32,
    /// Whether this is a group chat.
    #[serde(default)]
    pub is_group: bool,
    /// Participant ids.
    #[serde(default)]
    pub participants: Vec<UserId>,
    /// Chat avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Hidden from the main list.
    #[serde(default)]
    pub archived: bool,
}

impl ChatSummary {
    /// Case-insensitive match on the name or the last message preview.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.last_message.to_lowercase().contains(&query)
    }
}
