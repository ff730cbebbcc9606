//! Per-chat message history.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use gossip_core::types::ChatId;
use gossip_entity::message::Message;
use gossip_realtime::{EventKind, ListenerId, ListenerRegistry, PresenceEvent};

/// Append-only message history, one timestamp-ordered list per chat.
///
/// Messages arriving out of order are slotted in by timestamp; ties keep
/// arrival order. A message id already present in the chat is ignored.
#[derive(Debug, Default)]
pub struct MessageLog {
    chats: RwLock<HashMap<ChatId, Vec<Message>>>,
}

impl MessageLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log holding `messages`. Messages without a chat id are
    /// skipped.
    pub fn with_messages(messages: impl IntoIterator<Item = Message>) -> Self {
        let log = Self::new();
        for message in messages {
            log.append(message);
        }
        log
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<ChatId, Vec<Message>>> {
        self.chats.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<ChatId, Vec<Message>>> {
        self.chats.write().unwrap_or_else(|p| p.into_inner())
    }

    /// Record `message` under its chat. Returns `false` when it carries no
    /// chat id or is already present.
    pub fn append(&self, message: Message) -> bool {
        let Some(chat_id) = message.chat_id.clone() else {
            debug!(message_id = %message.id, "Message without chat id not logged");
            return false;
        };

        let mut chats = self.write();
        let history = chats.entry(chat_id).or_default();
        if history.iter().any(|m| m.id == message.id) {
            return false;
        }
        let at = history.partition_point(|m| m.timestamp <= message.timestamp);
        history.insert(at, message);
        true
    }

    /// The last `limit` messages of `chat`, oldest first.
    pub fn history(&self, chat: &ChatId, limit: usize) -> Vec<Message> {
        self.read()
            .get(chat)
            .map(|history| history[history.len().saturating_sub(limit)..].to_vec())
            .unwrap_or_default()
    }

    /// The newest message of `chat`.
    pub fn latest(&self, chat: &ChatId) -> Option<Message> {
        self.read().get(chat).and_then(|h| h.last().cloned())
    }

    /// Number of messages in `chat`.
    pub fn count(&self, chat: &ChatId) -> usize {
        self.read().get(chat).map_or(0, Vec::len)
    }

    /// Log every `NEW_MESSAGE` event seen on `listeners`.
    pub fn attach(self: &Arc<Self>, listeners: &ListenerRegistry) -> ListenerId {
        let log = Arc::clone(self);
        listeners.on(EventKind::NewMessage, move |event| {
            if let PresenceEvent::NewMessage(message) = event {
                log.append(message.clone());
            }
        })
    }
}
