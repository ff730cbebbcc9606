//! Session store holding the signed-in identity.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use gossip_core::result::AppResult;
use gossip_core::traits::KeyValueStore;
use gossip_entity::session::{Credentials, Session, SignupRequest};
use gossip_entity::user::User;

use crate::gateway::AuthGateway;

/// Holds the authenticated identity and mirrors it into local storage.
///
/// State is either empty (signed out) or one [`Session`]. Every successful
/// login or signup replaces it and writes the snapshot under `storage_key`;
/// logout clears both.
pub struct SessionStore {
    /// Remote authority for credentials.
    gateway: Arc<dyn AuthGateway>,
    /// Durable storage for the snapshot.
    storage: Arc<dyn KeyValueStore>,
    /// Key the snapshot lives under.
    storage_key: String,
    /// Current session, if any.
    state: RwLock<Option<Session>>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("gateway", &self.gateway)
            .field("storage", &self.storage.backend_name())
            .field("storage_key", &self.storage_key)
            .finish()
    }
}

impl SessionStore {
    /// Create an empty (signed-out) store. Call [`restore`](Self::restore)
    /// to pick up a previous session.
    pub fn new(
        gateway: Arc<dyn AuthGateway>,
        storage: Arc<dyn KeyValueStore>,
        storage_key: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            storage,
            storage_key: storage_key.into(),
            state: RwLock::new(None),
        }
    }

    /// Load the persisted snapshot, if there is one.
    ///
    /// A snapshot that cannot be parsed is logged, deleted, and treated as
    /// absent. Only storage I/O failures are returned as errors.
    pub async fn restore(&self) -> AppResult<Option<Session>> {
        let Some(raw) = self.storage.get(&self.storage_key).await? else {
            debug!(key = %self.storage_key, "No stored session");
            return Ok(None);
        };

        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => {
                info!(user_id = %session.user.id, "Restored session");
                *self.state.write().await = Some(session.clone());
                Ok(Some(session))
            }
            Err(e) => {
                warn!(key = %self.storage_key, error = %e, "Discarding corrupt session snapshot");
                if let Err(e) = self.storage.remove(&self.storage_key).await {
                    warn!(error = %e, "Failed to delete corrupt session snapshot");
                }
                *self.state.write().await = None;
                Ok(None)
            }
        }
    }

    /// Sign in. Returns `true` on success; on any failure the store stays
    /// signed out and the reason is logged.
    pub async fn login(&self, identifier: &str, secret: &str) -> bool {
        match self.try_login(identifier, secret).await {
            Ok(_) => true,
            Err(e) => {
                warn!(kind = %e.kind, error = %e.message, "Login failed");
                false
            }
        }
    }

    /// Create an account and sign in. Returns `true` on success.
    pub async fn signup(&self, name: &str, identifier: &str, secret: &str) -> bool {
        match self.try_signup(name, identifier, secret).await {
            Ok(_) => true,
            Err(e) => {
                warn!(kind = %e.kind, error = %e.message, "Signup failed");
                false
            }
        }
    }

    /// Sign in, reporting why it failed.
    pub async fn try_login(&self, identifier: &str, secret: &str) -> AppResult<Session> {
        let credentials = Credentials::new(identifier, secret)?;
        let session = self.gateway.login(&credentials).await?;
        self.establish(session).await
    }

    /// Create an account and sign in, reporting why it failed.
    pub async fn try_signup(
        &self,
        name: &str,
        identifier: &str,
        secret: &str,
    ) -> AppResult<Session> {
        let request = SignupRequest::new(name, identifier, secret)?;
        let session = self.gateway.signup(&request).await?;
        self.establish(session).await
    }

    /// Sign out.
    ///
    /// The gateway is told first on a best-effort basis; local state and
    /// the snapshot are cleared regardless of its answer.
    pub async fn logout(&self) {
        let previous = self.state.write().await.take();

        if let Some(session) = &previous {
            if let Err(e) = self.gateway.logout(&session.token).await {
                warn!(user_id = %session.user.id, error = %e, "Gateway logout failed");
            }
        }

        if let Err(e) = self.storage.remove(&self.storage_key).await {
            warn!(error = %e, "Failed to delete session snapshot");
        }

        if let Some(session) = previous {
            info!(user_id = %session.user.id, "Logged out");
        }
    }

    /// The signed-in user.
    pub async fn current_user(&self) -> Option<User> {
        self.state.read().await.as_ref().map(|s| s.user.clone())
    }

    /// The bearer token of the current session.
    pub async fn token(&self) -> Option<String> {
        self.state.read().await.as_ref().map(|s| s.token.clone())
    }

    /// Whether a session is held.
    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_some()
    }

    /// A copy of the whole session.
    pub async fn snapshot(&self) -> Option<Session> {
        self.state.read().await.clone()
    }

    async fn establish(&self, session: Session) -> AppResult<Session> {
        let raw = serde_json::to_string(&session)?;
        self.storage.set(&self.storage_key, &raw).await?;
        *self.state.write().await = Some(session.clone());
        info!(user_id = %session.user.id, "Session established");
        Ok(session)
    }
}
