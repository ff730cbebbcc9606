//! Authentication gateways.
//!
//! The session store never talks to a backend directly; it goes through an
//! [`AuthGateway`]. The REST client implements it for the real backend and
//! [`MockAuthGateway`] serves the demo accounts offline.

pub mod mock;

use async_trait::async_trait;

use gossip_core::result::AppResult;
use gossip_entity::session::{Credentials, Session, SignupRequest};

pub use mock::MockAuthGateway;

/// Remote authority that issues and revokes sessions.
#[async_trait]
pub trait AuthGateway: Send + Sync + std::fmt::Debug + 'static {
    /// Exchange credentials for a session.
    ///
    /// Bad credentials are an `Authentication` error; an unreachable
    /// backend is `ServiceUnavailable`.
    async fn login(&self, credentials: &Credentials) -> AppResult<Session>;

    /// Register a new account and sign it in.
    ///
    /// A taken identifier is a `Conflict` error.
    async fn signup(&self, request: &SignupRequest) -> AppResult<Session>;

    /// Revoke the token server-side.
    async fn logout(&self, token: &str) -> AppResult<()>;
}
