//! `ConnectionsApi` over the REST backend.

use async_trait::async_trait;
use serde_json::json;

use gossip_core::result::AppResult;
use gossip_core::types::{UserId, decode_list};
use gossip_entity::connection::Connection;
use gossip_service::ConnectionsApi;

use super::paths;
use crate::client::ApiClient;

impl ApiClient {
    async fn connection_action(&self, path: &str, user: &UserId) -> AppResult<()> {
        self.post(path, &json!({ "userId": user })).await.map(|_| ())
    }
}

#[async_trait]
impl ConnectionsApi for ApiClient {
    async fn list_connections(&self) -> AppResult<Vec<Connection>> {
        decode_list(self.get(paths::CONNECTIONS, &[]).await?)
    }

    async fn send_request(&self, to: &UserId) -> AppResult<()> {
        self.connection_action(paths::CONNECTIONS_REQUEST, to).await
    }

    async fn accept_request(&self, from: &UserId) -> AppResult<()> {
        self.connection_action(paths::CONNECTIONS_ACCEPT, from).await
    }

    async fn decline_request(&self, from: &UserId) -> AppResult<()> {
        self.connection_action(paths::CONNECTIONS_DECLINE, from).await
    }

    async fn cancel_request(&self, to: &UserId) -> AppResult<()> {
        self.connection_action(paths::CONNECTIONS_CANCEL, to).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gossip_core::error::ErrorKind;
    use gossip_entity::connection::ConnectionStatus;

    use crate::stub::StubServer;

    #[tokio::test]
    async fn test_list_reads_backend_aliases() {
        let body = r#"{"code":200,"data":{"connections":[
            {"id":"c9","requesterId":"4","recipientId":"0","status":"pending","createdAt":"2024-01-01T00:00:00Z"}
        ]}}"#;
        let server = StubServer::start(vec![(200, body.to_string())]).await;

        let records = server.client().list_connections().await.unwrap();
        assert_eq!(records[0].from_user_id, UserId::from("4"));
        assert_eq!(records[0].status, ConnectionStatus::Pending);
    }

    #[tokio::test]
    async fn test_actions_post_target_user() {
        let server = StubServer::start(vec![(200, r#"{"code":0,"message":"ok"}"#.to_string())]).await;
        let api = server.client();

        api.accept_request(&UserId::from("1")).await.unwrap();
        let request = server.request(0);
        assert_eq!(request.line(), "POST /api/connections/accept");
        assert_eq!(request.body, r#"{"userId":"1"}"#);
    }

    #[tokio::test]
    async fn test_conflict_surfaces_backend_message() {
        let server =
            StubServer::start(vec![(409, r#"{"message":"Request already sent"}"#.to_string())]).await;
        let err = server.client().send_request(&UserId::from("2")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.message, "Request already sent");
    }
}
