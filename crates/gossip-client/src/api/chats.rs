//! `ChatsApi` over the REST backend, plus per-chat settings, blocking,
//! leaving groups and archived messages.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use gossip_core::result::AppResult;
use gossip_core::types::{ChatId, MessageId, decode_list};
use gossip_entity::chat::ChatSummary;
use gossip_service::ChatsApi;

use super::paths;
use crate::client::ApiClient;

/// Body of `PUT /api/chats/{id}/settings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSettings {
    pub notifications: bool,
    pub mute_chat: bool,
    pub read_receipts: bool,
    pub auto_delete: bool,
    /// New chat name; omitted to keep the current one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            notifications: true,
            mute_chat: false,
            read_receipts: true,
            auto_delete: false,
            name: None,
        }
    }
}

/// A message moved out of a chat's history.
///
/// Timestamps are kept as the backend formats them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedMessage {
    pub id: MessageId,
    #[serde(alias = "text")]
    pub content: String,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub timestamp: String,
}

impl ApiClient {
    /// Save notification and display settings for `id`.
    pub async fn update_chat_settings(&self, id: &ChatId, settings: &ChatSettings) -> AppResult<()> {
        self.put(&format!("{}/{id}/settings", paths::CHATS), settings)
            .await?;
        info!(chat_id = %id, "Chat settings updated");
        Ok(())
    }

    /// Block the other participant of the direct chat `id`.
    pub async fn block_chat(&self, id: &ChatId) -> AppResult<()> {
        self.post(&format!("{}/{id}/block", paths::CHATS), &json!({}))
            .await?;
        info!(chat_id = %id, "Chat blocked");
        Ok(())
    }

    /// Leave the group chat `id`.
    pub async fn leave_group(&self, id: &ChatId) -> AppResult<()> {
        self.post(&format!("{}/{id}/leave", paths::GROUPS), &json!({}))
            .await?;
        info!(chat_id = %id, "Left group");
        Ok(())
    }

    /// Archived messages of `id`.
    pub async fn archived_messages(&self, id: &ChatId) -> AppResult<Vec<ArchivedMessage>> {
        decode_list(
            self.get(&format!("{}/{id}/archived-messages", paths::CHATS), &[])
                .await?,
        )
    }

    /// Put an archived message back into the history of `id`.
    pub async fn restore_message(&self, id: &ChatId, message: &MessageId) -> AppResult<()> {
        let path = format!("{}/{id}/messages/{message}/restore", paths::CHATS);
        self.post(&path, &json!({})).await.map(|_| ())
    }

    /// Permanently delete an archived message.
    pub async fn delete_archived_message(&self, id: &ChatId, message: &MessageId) -> AppResult<()> {
        let path = format!("{}/{id}/messages/{message}", paths::CHATS);
        self.delete(&path).await.map(|_| ())
    }
}

#[async_trait]
impl ChatsApi for ApiClient {
    async fn archived_chats(&self) -> AppResult<Vec<ChatSummary>> {
        decode_list(self.get(paths::CHATS_ARCHIVED, &[]).await?)
    }

    async fn unarchive_chat(&self, id: &ChatId) -> AppResult<()> {
        let path = format!("{}/{id}/unarchive", paths::CHATS);
        self.post(&path, &json!({})).await.map(|_| ())
    }

    async fn delete_chat(&self, id: &ChatId) -> AppResult<()> {
        self.delete(&format!("{}/{id}", paths::CHATS)).await.map(|_| ())
    }
}
