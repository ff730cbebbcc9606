//! `AuthGateway` over the REST backend.

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use gossip_auth::AuthGateway;
use gossip_core::result::AppResult;
use gossip_core::types::decode_item;
use gossip_entity::session::{Credentials, Session, SignupRequest};

use super::paths;
use crate::client::ApiClient;

#[async_trait]
impl AuthGateway for ApiClient {
    async fn login(&self, credentials: &Credentials) -> AppResult<Session> {
        let body = self.post(paths::AUTH_LOGIN, credentials).await?;
        let session: Session = decode_item(body)?;
        self.set_token(session.token.clone());
        info!(user_id = %session.user.id, "Signed in against backend");
        Ok(session)
    }

    async fn signup(&self, request: &SignupRequest) -> AppResult<Session> {
        let body = self.post(paths::AUTH_REGISTER, request).await?;
        let session: Session = decode_item(body)?;
        self.set_token(session.token.clone());
        info!(user_id = %session.user.id, "Registered against backend");
        Ok(session)
    }

    async fn logout(&self, token: &str) -> AppResult<()> {
        self.set_token(token);
        let outcome = self.post(paths::AUTH_LOGOUT, &json!({})).await;
        self.clear_token();
        outcome.map(|_| ())
    }
}
