//! The chat list held by the client.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info, warn};

use gossip_core::error::AppError;
use gossip_core::result::AppResult;
use gossip_core::types::{ChatId, UserId};
use gossip_entity::chat::ChatSummary;
use gossip_entity::message::Message;

use crate::remote::ChatsApi;

/// Which chats to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChatFilter {
    /// Every chat.
    #[default]
    All,
    /// Group chats only.
    Groups,
}

impl ChatFilter {
    /// Return the filter name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Groups => "groups",
        }
    }

    fn admits(&self, chat: &ChatSummary) -> bool {
        match self {
            Self::All => true,
            Self::Groups => chat.is_group,
        }
    }
}

impl fmt::Display for ChatFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChatFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "groups" | "group" => Ok(Self::Groups),
            other => Err(AppError::validation(format!("Unknown chat filter: {other}"))),
        }
    }
}

/// Chats known to the client, archived ones included.
#[derive(Debug, Clone, Default)]
pub struct ChatList {
    chats: Vec<ChatSummary>,
}

impl ChatList {
    /// Create a list from `chats`.
    pub fn new(chats: Vec<ChatSummary>) -> Self {
        Self { chats }
    }

    /// Number of chats, archived included.
    pub fn len(&self) -> usize {
        self.chats.len()
    }

    /// Whether the list holds no chats at all.
    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }

    /// Look a chat up by id.
    pub fn get(&self, id: &ChatId) -> Option<&ChatSummary> {
        self.chats.iter().find(|c| &c.id == id)
    }

    fn get_mut(&mut self, id: &ChatId) -> AppResult<&mut ChatSummary> {
        self.chats
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| AppError::not_found(format!("Chat {id} not found")))
    }

    /// Non-archived chats matching `query` and `filter`, unread first,
    /// then most recent first. A blank query matches everything.
    pub fn visible(&self, query: &str, filter: ChatFilter) -> Vec<ChatSummary> {
        let query = query.trim();
        let mut rows: Vec<ChatSummary> = self
            .chats
            .iter()
            .filter(|c| !c.archived && filter.admits(c))
            .filter(|c| query.is_empty() || c.matches(query))
            .cloned()
            .collect();
        sort_for_display(&mut rows);
        rows
    }

    /// Archived chats, most recent first.
    pub fn archived(&self) -> Vec<ChatSummary> {
        let mut rows: Vec<ChatSummary> = self.chats.iter().filter(|c| c.archived).cloned().collect();
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        rows
    }

    /// Hide a chat from the main list.
    pub fn archive(&mut self, id: &ChatId) -> AppResult<()> {
        self.get_mut(id)?.archived = true;
        debug!(chat_id = %id, "Chat archived");
        Ok(())
    }

    /// Bring an archived chat back.
    pub fn unarchive(&mut self, id: &ChatId) -> AppResult<()> {
        self.get_mut(id)?.archived = false;
        debug!(chat_id = %id, "Chat unarchived");
        Ok(())
    }

    /// Remove a chat. Returns the removed summary.
    pub fn delete(&mut self, id: &ChatId) -> AppResult<ChatSummary> {
        let index = self
            .chats
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| AppError::not_found(format!("Chat {id} not found")))?;
        Ok(self.chats.remove(index))
    }

    /// Clear the unread counter of a chat.
    pub fn mark_read(&mut self, id: &ChatId) -> AppResult<()> {
        self.get_mut(id)?.unread_count = 0;
        Ok(())
    }

    /// Update the preview row for an incoming message. Messages without a
    /// chat id, or for unknown chats, are ignored. Messages by `me` do not
    /// count as unread.
    pub fn record_message(&mut self, message: &Message, me: &UserId) -> bool {
        let Some(chat_id) = &message.chat_id else {
            return false;
        };
        let Ok(chat) = self.get_mut(chat_id) else {
            debug!(chat_id = %chat_id, "Message for unknown chat ignored");
            return false;
        };

        chat.last_message = message.text.clone();
        chat.timestamp = chat.timestamp.max(message.timestamp);
        if &message.user_id != me {
            chat.unread_count += 1;
        }
        true
    }

    /// Merge the backend's archived chats into the list, replacing local
    /// copies with the same id.
    pub async fn sync_archived(&mut self, api: &dyn ChatsApi) -> AppResult<usize> {
        let remote = api.archived_chats().await?;
        let count = remote.len();
        for mut chat in remote {
            chat.archived = true;
            match self.chats.iter_mut().find(|c| c.id == chat.id) {
                Some(existing) => *existing = chat,
                None => self.chats.push(chat),
            }
        }
        info!(count, "Archived chats synced");
        Ok(count)
    }

    /// Unarchive locally, then on the backend. The local change is undone
    /// if the backend refuses.
    pub async fn unarchive_remote(&mut self, api: &dyn ChatsApi, id: &ChatId) -> AppResult<()> {
        let was_archived = self.get_mut(id)?.archived;
        self.unarchive(id)?;
        if let Err(e) = api.unarchive_chat(id).await {
            warn!(chat_id = %id, error = %e.message, "Unarchive rejected, rolling back");
            self.get_mut(id)?.archived = was_archived;
            return Err(e);
        }
        Ok(())
    }

    /// Delete on the backend, then locally.
    pub async fn delete_remote(&mut self, api: &dyn ChatsApi, id: &ChatId) -> AppResult<ChatSummary> {
        self.get_mut(id)?;
        api.delete_chat(id).await?;
        self.delete(id)
    }
}

/// Unread first, then most recent first.
pub fn sort_for_display(chats: &mut [ChatSummary]) {
    chats.sort_by(|a, b| {
        b.unread_count
            .cmp(&a.unread_count)
            .then_with(|| b.timestamp.cmp(&a.timestamp))
    });
}
