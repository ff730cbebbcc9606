//! User entity model.

use gossip_core::types::UserId;
use serde::{Deserialize, Serialize};

/// A user as seen by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Display name.
    #[serde(alias = "display_name", alias = "username")]
    pub name: String,
    /// Avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Presence flag; only presence events change it after load.
    #[serde(default, alias = "is_online")]
    pub is_online: bool,
}

impl User {
    /// Build a user that is offline until presence says otherwise.
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar: None,
            is_online: false,
        }
    }

    /// Set the avatar URL.
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Set the presence flag.
    pub fn with_online(mut self, online: bool) -> Self {
        self.is_online = online;
        self
    }

    /// Case-insensitive substring match on the display name.
    pub fn name_matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.trim().to_lowercase())
    }
}
