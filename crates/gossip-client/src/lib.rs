//! # gossip-client
//!
//! HTTP client for the GossipGo backend. [`ApiClient`] implements every
//! backend seam the other crates define:
//!
//! - `gossip_auth::AuthGateway` for login, signup and logout
//! - `gossip_service::UserSource` for the user directory
//! - `gossip_service::ConnectionsApi` for contact requests
//! - `gossip_service::ChatsApi` for archive management
//!
//! It also covers the endpoints with no local counterpart: message
//! history, calls, account settings, chat settings and group membership.
//!
//! Transient failures (transport errors, 429, 500/502/503/504) are retried with
//! exponential backoff and jitter; see [`retry`].

pub mod api;
pub mod client;
pub mod error;
pub mod retry;

#[cfg(test)]
pub(crate) mod stub;

use std::sync::Arc;

use gossip_auth::{AuthGateway, MockAuthGateway};
use gossip_core::config::session::GatewayKind;

pub use api::chats::{ArchivedMessage, ChatSettings};
pub use api::messages::{CallRequest, CallTicket};
pub use client::ApiClient;
pub use retry::RetryPolicy;

/// The authentication gateway selected by configuration. `Http` shares
/// `api`, so a login also authorizes every later call made through it.
pub fn select_gateway(kind: GatewayKind, api: &Arc<ApiClient>) -> Arc<dyn AuthGateway> {
    match kind {
        GatewayKind::Http => Arc::clone(api) as Arc<dyn AuthGateway>,
        GatewayKind::Mock => Arc::new(MockAuthGateway::new()) as Arc<dyn AuthGateway>,
    }
}
