//! Presence roster: folds `USER_STATUS` events into per-user online flags.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::trace;

use gossip_core::types::UserId;
use gossip_entity::user::User;

use crate::event::{EventKind, PresenceEvent};
use crate::listener::{ListenerId, ListenerRegistry};

/// Latest known online flag per user.
///
/// A flag only changes when an event says so; there is no timeout.
#[derive(Debug, Default)]
pub struct PresenceRoster {
    statuses: DashMap<UserId, bool>,
}

impl PresenceRoster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a single event. Returns the change if it was a status event.
    pub fn apply(&self, event: &PresenceEvent) -> Option<(UserId, bool)> {
        let PresenceEvent::UserStatus(update) = event else {
            return None;
        };
        self.set(update.user_id.clone(), update.is_online);
        Some((update.user_id.clone(), update.is_online))
    }

    /// Record a flag directly.
    pub fn set(&self, user_id: UserId, online: bool) {
        trace!(user_id = %user_id, online, "Presence updated");
        self.statuses.insert(user_id, online);
    }

    /// Seed the roster from a loaded user list.
    pub fn seed(&self, users: &[User]) {
        for user in users {
            self.statuses.insert(user.id.clone(), user.is_online);
        }
    }

    /// Last known flag for `user_id`, if any event or seed mentioned it.
    pub fn is_online(&self, user_id: &UserId) -> Option<bool> {
        self.statuses.get(user_id).map(|v| *v.value())
    }

    /// Overwrite `is_online` on every user the roster knows about.
    pub fn apply_to(&self, users: &mut [User]) {
        for user in users.iter_mut() {
            if let Some(online) = self.is_online(&user.id) {
                user.is_online = online;
            }
        }
    }

    /// Ids currently reported online, sorted.
    pub fn online_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self
            .statuses
            .iter()
            .filter(|entry| *entry.value())
            .map(|entry| entry.key().clone())
            .collect();
        ids.sort();
        ids
    }

    /// Keep this roster current by listening on `listeners`.
    pub fn attach(self: &Arc<Self>, listeners: &ListenerRegistry) -> ListenerId {
        let roster = Arc::clone(self);
        listeners.on(EventKind::UserStatus, move |event| {
            roster.apply(event);
        })
    }
}
