//! Backend seams used by the services.
//!
//! The REST client implements all of them; tests use small in-memory
//! fakes.

use async_trait::async_trait;

use gossip_core::result::AppResult;
use gossip_core::types::{ChatId, UserId};
use gossip_entity::chat::ChatSummary;
use gossip_entity::connection::Connection;
use gossip_entity::user::User;

/// Source of user records.
#[async_trait]
pub trait UserSource: Send + Sync + std::fmt::Debug {
    /// Every user the backend exposes.
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Users whose name matches `query`.
    async fn search_users(&self, query: &str) -> AppResult<Vec<User>>;

    /// Users with the given ids; unknown ids are skipped.
    async fn users_by_ids(&self, ids: &[UserId]) -> AppResult<Vec<User>>;
}

/// Remote side of the connection graph.
#[async_trait]
pub trait ConnectionsApi: Send + Sync + std::fmt::Debug {
    /// All records involving the signed-in user.
    async fn list_connections(&self) -> AppResult<Vec<Connection>>;

    /// Ask `to` to connect.
    async fn send_request(&self, to: &UserId) -> AppResult<()>;

    /// Accept the request from `from`.
    async fn accept_request(&self, from: &UserId) -> AppResult<()>;

    /// Decline the request from `from`.
    async fn decline_request(&self, from: &UserId) -> AppResult<()>;

    /// Withdraw the request sent to `to`.
    async fn cancel_request(&self, to: &UserId) -> AppResult<()>;
}

/// Remote chat management.
#[async_trait]
pub trait ChatsApi: Send + Sync + std::fmt::Debug {
    /// Chats the user has archived.
    async fn archived_chats(&self) -> AppResult<Vec<ChatSummary>>;

    /// Move a chat back to the main list.
    async fn unarchive_chat(&self, id: &ChatId) -> AppResult<()>;

    /// Permanently delete a chat.
    async fn delete_chat(&self, id: &ChatId) -> AppResult<()>;
}
