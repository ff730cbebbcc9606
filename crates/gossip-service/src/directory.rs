//! User directory: listing, search, and batch lookup with offline fallback.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::{debug, warn};

use gossip_core::error::AppError;
use gossip_core::types::UserId;
use gossip_entity::user::User;
use gossip_realtime::PresenceRoster;

use crate::remote::UserSource;

/// Where a listing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The backend answered.
    Remote,
    /// The backend failed and local sample data was used.
    Fallback,
}

/// Result of a directory query.
#[derive(Debug, Clone)]
pub struct Listing {
    /// Matching users, online first then by name.
    pub users: Vec<User>,
    /// Where they came from.
    pub origin: Origin,
    /// The backend error that triggered the fallback.
    pub error: Option<AppError>,
}

/// Looks users up through a [`UserSource`], falling back to a local list
/// when the backend is unavailable. The signed-in user is never listed.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    source: Arc<dyn UserSource>,
    fallback: Vec<User>,
    current: Option<UserId>,
    presence: Option<Arc<PresenceRoster>>,
}

impl UserDirectory {
    /// Create a directory over `source` with `fallback` as offline data.
    pub fn new(source: Arc<dyn UserSource>, fallback: Vec<User>) -> Self {
        Self {
            source,
            fallback,
            current: None,
            presence: None,
        }
    }

    /// Exclude `user` from every listing.
    pub fn for_user(mut self, user: UserId) -> Self {
        self.current = Some(user);
        self
    }

    /// Overlay live presence onto every listing.
    pub fn with_presence(mut self, roster: Arc<PresenceRoster>) -> Self {
        self.presence = Some(roster);
        self
    }

    /// All users.
    pub async fn list_users(&self) -> Listing {
        let remote = self.source.list_users().await;
        self.finish("list", remote, |_| true)
    }

    /// Users whose name contains `query`, ignoring case. A blank query
    /// lists everyone.
    pub async fn search(&self, query: &str) -> Listing {
        let query = query.trim();
        if query.is_empty() {
            return self.list_users().await;
        }
        let remote = self.source.search_users(query).await;
        self.finish("search", remote, |u| u.name_matches(query))
    }

    /// Users with the given ids.
    pub async fn batch(&self, ids: &[UserId]) -> Listing {
        if ids.is_empty() {
            return Listing {
                users: Vec::new(),
                origin: Origin::Remote,
                error: None,
            };
        }
        let remote = self.source.users_by_ids(ids).await;
        self.finish("batch", remote, |u| ids.contains(&u.id))
    }

    fn finish<F>(&self, op: &str, remote: Result<Vec<User>, AppError>, keep: F) -> Listing
    where
        F: Fn(&User) -> bool,
    {
        let (users, origin, error) = match remote {
            Ok(users) => {
                debug!(op, count = users.len(), "Directory answered by backend");
                (users, Origin::Remote, None)
            }
            Err(e) => {
                warn!(op, kind = %e.kind, error = %e.message, "Directory backend failed, using local data");
                let users = self.fallback.iter().filter(|&u| keep(u)).cloned().collect();
                (users, Origin::Fallback, Some(e))
            }
        };

        let mut users: Vec<User> = users
            .into_iter()
            .filter(|u| self.current.as_ref() != Some(&u.id))
            .collect();
        if let Some(roster) = &self.presence {
            roster.apply_to(&mut users);
        }
        sort_for_display(&mut users);

        Listing {
            users,
            origin,
            error,
        }
    }
}

/// Online users first, then alphabetical by name (case-insensitive).
pub fn sort_for_display(users: &mut [User]) {
    users.sort_by(|a, b| match (a.is_online, b.is_online) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    });
}
