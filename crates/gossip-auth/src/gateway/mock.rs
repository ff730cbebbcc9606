//! In-memory gateway serving the demo accounts.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use rand::Rng;
use rand::distr::Alphanumeric;
use tracing::{debug, info};

use gossip_core::error::AppError;
use gossip_core::result::AppResult;
use gossip_core::types::UserId;
use gossip_entity::session::{Credentials, Session, SignupRequest};
use gossip_entity::user::User;

/// Length of generated bearer tokens.
const TOKEN_LEN: usize = 32;

#[derive(Debug, Clone)]
struct Account {
    secret: String,
    user: User,
}

/// Gateway backed by an in-process credential table.
///
/// Seeded with two demo accounts: `1` / `user1password` (Sarah Johnson)
/// and `2` / `user2password` (Michael Chen).
#[derive(Debug)]
pub struct MockAuthGateway {
    /// Identifier -> account.
    accounts: DashMap<String, Account>,
    /// Issued tokens -> user id.
    tokens: DashMap<String, UserId>,
    /// Simulated round-trip time.
    latency: Duration,
}

impl MockAuthGateway {
    /// Create a gateway with the demo accounts and no latency.
    pub fn new() -> Self {
        let gateway = Self {
            accounts: DashMap::new(),
            tokens: DashMap::new(),
            latency: Duration::ZERO,
        };
        gateway.register(
            "1",
            "user1password",
            User::new("1", "Sarah Johnson")
                .with_avatar("https://i.pravatar.cc/150?img=1")
                .with_online(true),
        );
        gateway.register(
            "2",
            "user2password",
            User::new("2", "Michael Chen")
                .with_avatar("https://i.pravatar.cc/150?img=8")
                .with_online(true),
        );
        gateway
    }

    /// Delay every call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Add an account.
    pub fn register(&self, identifier: &str, secret: &str, user: User) {
        self.accounts.insert(
            identifier.to_string(),
            Account {
                secret: secret.to_string(),
                user,
            },
        );
    }

    /// Whether `token` is currently valid.
    pub fn is_token_active(&self, token: &str) -> bool {
        self.tokens.contains_key(token)
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn issue(&self, user: User) -> Session {
        let token: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LEN)
            .map(char::from)
            .collect();
        self.tokens.insert(token.clone(), user.id.clone());
        Session::new(user, token)
    }
}

impl Default for MockAuthGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl super::AuthGateway for MockAuthGateway {
    async fn login(&self, credentials: &Credentials) -> AppResult<Session> {
        self.simulate_latency().await;

        let user = match self.accounts.get(&credentials.identifier) {
            Some(account) if account.secret == credentials.secret => account.user.clone(),
            _ => return Err(AppError::authentication("Invalid credentials")),
        };

        debug!(user_id = %user.id, "Mock login accepted");
        Ok(self.issue(user))
    }

    async fn signup(&self, request: &SignupRequest) -> AppResult<Session> {
        self.simulate_latency().await;

        if self.accounts.contains_key(&request.identifier) {
            return Err(AppError::conflict(format!(
                "Identifier '{}' is already registered",
                request.identifier
            )));
        }

        let avatar = rand::rng().random_range(0..70);
        let user = User::new(
            format!("user-{}", Utc::now().timestamp_millis()),
            request.name.clone(),
        )
        .with_avatar(format!("https://i.pravatar.cc/150?img={avatar}"))
        .with_online(true);

        self.register(&request.identifier, &request.secret, user.clone());
        info!(user_id = %user.id, "Mock account created");
        Ok(self.issue(user))
    }

    async fn logout(&self, token: &str) -> AppResult<()> {
        self.simulate_latency().await;
        match self.tokens.remove(token) {
            Some(_) => Ok(()),
            None => Err(AppError::authentication("Unknown session token")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::AuthGateway;
    use gossip_core::error::ErrorKind;

    #[tokio::test]
    async fn test_demo_accounts_log_in() {
        let gateway = MockAuthGateway::new();
        let creds = Credentials::new("2", "user2password").unwrap();
        let session = gateway.login(&creds).await.unwrap();

        assert_eq!(session.user.name, "Michael Chen");
        assert_eq!(session.token.len(), TOKEN_LEN);
        assert!(gateway.is_token_active(&session.token));
    }

    #[tokio::test]
    async fn test_wrong_password_is_authentication_error() {
        let gateway = MockAuthGateway::new();
        let creds = Credentials::new("1", "user2password").unwrap();
        let err = gateway.login(&creds).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_signup_rejects_taken_identifier() {
        let gateway = MockAuthGateway::new();
        let request = SignupRequest::new("Ada", "ada@example.com", "pw").unwrap();
        let session = gateway.signup(&request).await.unwrap();
        assert!(session.user.id.as_str().starts_with("user-"));

        let err = gateway.signup(&request).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        let creds = Credentials::new("ada@example.com", "pw").unwrap();
        assert_eq!(gateway.login(&creds).await.unwrap().user.name, "Ada");
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_applied() {
        let gateway = MockAuthGateway::new().with_latency(Duration::from_secs(1));
        let creds = Credentials::new("1", "user1password").unwrap();
        let started = tokio::time::Instant::now();
        gateway.login(&creds).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(1));
    }
}
