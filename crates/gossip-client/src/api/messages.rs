//! Message and call endpoints.

use serde::{Deserialize, Serialize};
use tracing::debug;

use gossip_core::result::AppResult;
use gossip_core::types::{ChatId, decode_item, decode_list};
use gossip_entity::message::{Message, OutgoingMessage};

use super::paths;
use crate::client::ApiClient;

/// Body of `POST /api/calls/start`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    /// Chat whose participants are called.
    pub chat_id: ChatId,
    /// Video rather than audio only.
    #[serde(default)]
    pub video: bool,
}

/// What the backend returns for a started call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallTicket {
    /// Backend call identifier.
    #[serde(alias = "id")]
    pub call_id: String,
    /// Signalling endpoint, when the backend provides one.
    #[serde(default)]
    pub join_url: Option<String>,
}

impl ApiClient {
    /// Messages of `chat_id`, as the backend orders them. Messages that
    /// arrive without a chat id are tagged with `chat_id`.
    pub async fn list_messages(&self, chat_id: &ChatId) -> AppResult<Vec<Message>> {
        let body = self
            .get(paths::MESSAGES, &[("chatId", chat_id.as_str())])
            .await?;
        let messages: Vec<Message> = decode_list(body)?;
        debug!(chat_id = %chat_id, count = messages.len(), "Messages loaded");
        Ok(messages
            .into_iter()
            .map(|m| match m.chat_id {
                Some(_) => m,
                None => m.in_chat(chat_id.clone()),
            })
            .collect())
    }

    /// Store a message on the backend and return it as stored.
    pub async fn post_message(&self, message: &OutgoingMessage) -> AppResult<Message> {
        let stored: Message = decode_item(self.post(paths::MESSAGES, message).await?)?;
        debug!(message_id = %stored.id, chat_id = %message.chat_id, "Message stored");
        Ok(stored)
    }

    /// Ask the backend to start a call in `chat_id`.
    pub async fn start_call(&self, chat_id: &ChatId, video: bool) -> AppResult<CallTicket> {
        let request = CallRequest {
            chat_id: chat_id.clone(),
            video,
        };
        decode_item(self.post(paths::CALLS_START, &request).await?)
    }
}
