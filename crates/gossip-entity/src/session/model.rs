//! Authenticated session and the requests that create one.

use chrono::{DateTime, Utc};
use gossip_core::AppError;
use serde::{Deserialize, Serialize};

use crate::user::User;

/// The locally held authenticated identity.
///
/// This is the document persisted under the session storage key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// The signed-in user.
    pub user: User,
    /// Bearer token issued by the gateway.
    pub token: String,
    /// When the session was established.
    #[serde(default = "Utc::now")]
    pub authenticated_at: DateTime<Utc>,
}

impl Session {
    /// Create a session stamped with the current time.
    pub fn new(user: User, token: impl Into<String>) -> Self {
        Self {
            user,
            token: token.into(),
            authenticated_at: Utc::now(),
        }
    }
}

/// Login input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Login identifier (email or user id).
    pub identifier: String,
    /// Password.
    #[serde(rename = "password")]
    pub secret: String,
}

impl Credentials {
    /// Build credentials, rejecting blank fields.
    pub fn new(identifier: &str, secret: &str) -> Result<Self, AppError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(AppError::validation("identifier must not be empty"));
        }
        if secret.is_empty() {
            return Err(AppError::validation("password must not be empty"));
        }
        Ok(Self {
            identifier: identifier.to_string(),
            secret: secret.to_string(),
        })
    }
}

/// Signup input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    /// Display name for the new account.
    pub name: String,
    /// Login identifier.
    pub identifier: String,
    /// Password.
    #[serde(rename = "password")]
    pub secret: String,
}

impl SignupRequest {
    /// Build a signup request, rejecting blank fields.
    pub fn new(name: &str, identifier: &str, secret: &str) -> Result<Self, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("name must not be empty"));
        }
        let credentials = Credentials::new(identifier, secret)?;
        Ok(Self {
            name: name.to_string(),
            identifier: credentials.identifier,
            secret: credentials.secret,
        })
    }
}
