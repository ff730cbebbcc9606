//! `UserSource` over the REST backend.

use async_trait::async_trait;
use serde_json::json;

use gossip_core::result::AppResult;
use gossip_core::types::{UserId, decode_list};
use gossip_entity::user::User;
use gossip_service::UserSource;

use super::paths;
use crate::client::ApiClient;

#[async_trait]
impl UserSource for ApiClient {
    async fn list_users(&self) -> AppResult<Vec<User>> {
        decode_list(self.get(paths::USERS, &[]).await?)
    }

    async fn search_users(&self, query: &str) -> AppResult<Vec<User>> {
        decode_list(self.get(paths::USERS_SEARCH, &[("q", query)]).await?)
    }

    async fn users_by_ids(&self, ids: &[UserId]) -> AppResult<Vec<User>> {
        decode_list(self.post(paths::USERS_BATCH, &json!({ "userIds": ids })).await?)
    }
}
