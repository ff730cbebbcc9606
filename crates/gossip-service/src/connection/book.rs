//! The connection graph seen from the signed-in user.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use gossip_core::result::AppResult;
use gossip_core::traits::KeyValueStore;
use gossip_core::types::UserId;
use gossip_entity::connection::{Connection, ConnectionState};

use super::graph::{Change, ConnectionGraph};

/// A [`ConnectionGraph`] bound to the current user.
///
/// Interior locking makes the book `Send + Sync`, so one instance can be
/// shared behind an `Arc` by every task that needs it.
#[derive(Debug)]
pub struct ConnectionBook {
    current: UserId,
    graph: RwLock<ConnectionGraph>,
}

impl ConnectionBook {
    /// Create an empty book for `current`.
    pub fn new(current: UserId) -> Self {
        Self::with_graph(current, ConnectionGraph::new())
    }

    /// Create a book over an existing graph.
    pub fn with_graph(current: UserId, graph: ConnectionGraph) -> Self {
        Self {
            current,
            graph: RwLock::new(graph),
        }
    }

    /// Load the graph stored under `key`, or start empty.
    pub async fn load(store: &dyn KeyValueStore, key: &str, current: UserId) -> AppResult<Self> {
        let graph = match store.get(key).await? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => ConnectionGraph::new(),
        };
        debug!(key, records = graph.len(), "Loaded connection graph");
        Ok(Self::with_graph(current, graph))
    }

    /// Persist the graph under `key`.
    pub async fn save(&self, store: &dyn KeyValueStore, key: &str) -> AppResult<()> {
        let raw = serde_json::to_string(&*self.read())?;
        store.set(key, &raw).await
    }

    /// The user this book answers for.
    pub fn current_user(&self) -> &UserId {
        &self.current
    }

    fn read(&self) -> RwLockReadGuard<'_, ConnectionGraph> {
        self.graph.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, ConnectionGraph> {
        self.graph.write().unwrap_or_else(|p| p.into_inner())
    }

    /// Status between the current user and `other`.
    pub fn connection_status(&self, other: &UserId) -> ConnectionState {
        self.read().status(&self.current, other)
    }

    /// Whether the current user sent a request to `other`, in any status.
    pub fn is_request_sent_by_current_user(&self, other: &UserId) -> bool {
        self.read().is_request_sent_by(&self.current, other)
    }

    /// Ask `other` to connect.
    pub fn send_connection_request(&self, other: &UserId) -> AppResult<Connection> {
        let change = self.send_change(other)?;
        info!(to = %other, "Connection request sent");
        change.into_after()
    }

    /// Accept the pending request from `other`.
    pub fn accept_connection_request(&self, other: &UserId) -> AppResult<Connection> {
        let change = self.accept_change(other)?;
        info!(from = %other, "Connection request accepted");
        change.into_after()
    }

    /// Decline the pending request from `other`.
    pub fn decline_connection_request(&self, other: &UserId) -> AppResult<Connection> {
        let change = self.decline_change(other)?;
        info!(from = %other, "Connection request declined");
        change.into_after()
    }

    /// Withdraw the pending request sent to `other`. Returns the removed record.
    pub fn cancel_connection_request(&self, other: &UserId) -> AppResult<Connection> {
        let change = self.cancel_change(other)?;
        info!(to = %other, "Connection request cancelled");
        change.into_before()
    }

    /// Pending requests addressed to the current user.
    pub fn pending_requests(&self) -> Vec<Connection> {
        self.read().pending_for(&self.current)
    }

    /// Accepted connections involving the current user.
    pub fn connected_users(&self) -> Vec<Connection> {
        self.read().accepted_for(&self.current)
    }

    /// Ids of the users the current user is connected with.
    pub fn connected_user_ids(&self) -> Vec<UserId> {
        self.connected_users()
            .iter()
            .filter_map(|c| c.counterpart(&self.current).cloned())
            .collect()
    }

    /// Copy of every record.
    pub fn records(&self) -> Vec<Connection> {
        self.read().records().to_vec()
    }

    /// Replace the whole graph, e.g. after a refresh from the backend.
    pub fn replace(&self, graph: ConnectionGraph) {
        *self.write() = graph;
    }

    pub(crate) fn send_change(&self, other: &UserId) -> AppResult<Change> {
        self.write().send_request(&self.current, other)
    }

    pub(crate) fn accept_change(&self, other: &UserId) -> AppResult<Change> {
        self.write().accept(&self.current, other)
    }

    pub(crate) fn decline_change(&self, other: &UserId) -> AppResult<Change> {
        self.write().decline(&self.current, other)
    }

    pub(crate) fn cancel_change(&self, other: &UserId) -> AppResult<Change> {
        self.write().cancel(&self.current, other)
    }

    pub(crate) fn revert(&self, change: &Change) -> AppResult<()> {
        self.write().revert(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use gossip_storage::MemoryStore;

    #[test]
    fn full_request_lifecycle_from_both_sides() {
        let sarah = UserId::from("1");
        let michael = UserId::from("2");
        let sarah_book = ConnectionBook::new(sarah.clone());

        sarah_book.send_connection_request(&michael).unwrap();
        assert_eq!(sarah_book.connection_status(&michael), ConnectionState::Pending);
        assert!(sarah_book.is_request_sent_by_current_user(&michael));

        let michael_book =
            ConnectionBook::with_graph(michael.clone(), ConnectionGraph::from_records(sarah_book.records()));
        assert!(!michael_book.is_request_sent_by_current_user(&sarah));
        assert_eq!(michael_book.pending_requests().len(), 1);

        michael_book.accept_connection_request(&sarah).unwrap();
        assert!(michael_book.pending_requests().is_empty());
        assert_eq!(michael_book.connected_user_ids(), vec![sarah.clone()]);
    }

    #[test]
    fn cancel_returns_removed_record() {
        let me = UserId::from("0");
        let other = UserId::from("4");
        let book = ConnectionBook::new(me.clone());

        let sent = book.send_connection_request(&other).unwrap();
        let removed = book.cancel_connection_request(&other).unwrap();
        assert_eq!(sent.id, removed.id);
        assert_eq!(book.connection_status(&other), ConnectionState::None);
    }

    #[test]
    fn shared_across_threads() {
        let book = Arc::new(ConnectionBook::new(UserId::from("0")));
        let handles: Vec<_> = (1..=8)
            .map(|n| {
                let book = Arc::clone(&book);
                std::thread::spawn(move || {
                    book.send_connection_request(&UserId::new(n.to_string())).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(book.records().len(), 8);
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let store = MemoryStore::new();
        let me = UserId::from("0");
        let book = ConnectionBook::new(me.clone());
        book.send_connection_request(&UserId::from("3")).unwrap();
        book.save(&store, "connections").await.unwrap();

        let loaded = ConnectionBook::load(&store, "connections", me).await.unwrap();
        assert_eq!(loaded.records(), book.records());

        let empty = ConnectionBook::load(&store, "missing", UserId::from("0")).await.unwrap();
        assert!(empty.records().is_empty());
    }
}
