//! Connection record model.

use chrono::{DateTime, Utc};
use gossip_core::types::{ConnectionId, UserId};
use serde::{Deserialize, Serialize};

use super::status::ConnectionStatus;

/// A directed connection request between two users.
///
/// Lookups treat the pair as unordered; `from_user_id` is always the
/// requester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// Unique connection identifier.
    pub id: ConnectionId,
    /// Requester.
    #[serde(alias = "requesterId")]
    pub from_user_id: UserId,
    /// Recipient.
    #[serde(alias = "recipientId")]
    pub to_user_id: UserId,
    /// Current status.
    pub status: ConnectionStatus,
    /// When the request was made.
    pub created_at: DateTime<Utc>,
}

impl Connection {
    /// Create a fresh pending request.
    pub fn pending(from: UserId, to: UserId) -> Self {
        Self {
            id: ConnectionId::generate(),
            from_user_id: from,
            to_user_id: to,
            status: ConnectionStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Whether the record links `a` and `b` in either direction.
    pub fn links(&self, a: &UserId, b: &UserId) -> bool {
        (&self.from_user_id == a && &self.to_user_id == b)
            || (&self.from_user_id == b && &self.to_user_id == a)
    }

    /// Whether `user` is either side of the record.
    pub fn involves(&self, user: &UserId) -> bool {
        &self.from_user_id == user || &self.to_user_id == user
    }

    /// The side of the record that is not `user`.
    pub fn counterpart(&self, user: &UserId) -> Option<&UserId> {
        if &self.from_user_id == user {
            Some(&self.to_user_id)
        } else if &self.to_user_id == user {
            Some(&self.from_user_id)
        } else {
            None
        }
    }
}
