//! Connection book mirrored to the backend with optimistic updates.

use std::sync::Arc;

use tracing::{info, warn};

use gossip_core::error::{AppError, ErrorKind};
use gossip_core::result::AppResult;
use gossip_core::types::UserId;
use gossip_entity::connection::Connection;

use super::book::ConnectionBook;
use super::graph::{Change, ConnectionGraph};
use crate::remote::ConnectionsApi;

/// Applies each mutation to the local book first, then confirms it with
/// the backend. If the backend call fails the local change is reverted
/// and the backend error is returned. When the pair was changed by someone
/// else in the meantime nothing is reverted and the error is a `Conflict`
/// carrying the backend failure as its source.
#[derive(Debug, Clone)]
pub struct SyncedConnectionBook {
    book: Arc<ConnectionBook>,
    api: Arc<dyn ConnectionsApi>,
}

impl SyncedConnectionBook {
    /// Wrap `book`, confirming changes through `api`.
    pub fn new(book: Arc<ConnectionBook>, api: Arc<dyn ConnectionsApi>) -> Self {
        Self { book, api }
    }

    /// The local book; queries go straight to it.
    pub fn book(&self) -> &Arc<ConnectionBook> {
        &self.book
    }

    /// Replace local state with the backend's records.
    pub async fn refresh(&self) -> AppResult<usize> {
        let records = self.api.list_connections().await?;
        let count = records.len();
        self.book.replace(ConnectionGraph::from_records(records));
        info!(count, "Connection graph refreshed");
        Ok(count)
    }

    /// Ask `other` to connect.
    pub async fn send_connection_request(&self, other: &UserId) -> AppResult<Connection> {
        let change = self.book.send_change(other)?;
        self.confirm(&change, self.api.send_request(other).await)?;
        change.into_after()
    }

    /// Accept the pending request from `other`.
    pub async fn accept_connection_request(&self, other: &UserId) -> AppResult<Connection> {
        let change = self.book.accept_change(other)?;
        self.confirm(&change, self.api.accept_request(other).await)?;
        change.into_after()
    }

    /// Decline the pending request from `other`.
    pub async fn decline_connection_request(&self, other: &UserId) -> AppResult<Connection> {
        let change = self.book.decline_change(other)?;
        self.confirm(&change, self.api.decline_request(other).await)?;
        change.into_after()
    }

    /// Withdraw the pending request sent to `other`.
    pub async fn cancel_connection_request(&self, other: &UserId) -> AppResult<Connection> {
        let change = self.book.cancel_change(other)?;
        self.confirm(&change, self.api.cancel_request(other).await)?;
        change.into_before()
    }

    fn confirm(&self, change: &Change, outcome: AppResult<()>) -> AppResult<()> {
        let Err(e) = outcome else {
            return Ok(());
        };
        warn!(kind = %e.kind, error = %e.message, "Backend rejected connection change, rolling back");
        if let Err(conflict) = self.book.revert(change) {
            warn!(error = %conflict.message, "Rollback skipped, connection changed meanwhile");
            return Err(AppError::with_source(ErrorKind::Conflict, conflict.message, e));
        }
        Err(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use gossip_entity::connection::ConnectionState;
    use tokio::sync::Notify;

    #[derive(Debug, Default)]
    struct FakeApi {
        fail: bool,
        calls: Mutex<Vec<String>>,
        remote: Vec<Connection>,
    }

    impl FakeApi {
        fn record(&self, call: String) -> AppResult<()> {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                Err(AppError::service_unavailable("backend down"))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl ConnectionsApi for FakeApi {
        async fn list_connections(&self) -> AppResult<Vec<Connection>> {
            Ok(self.remote.clone())
        }
        async fn send_request(&self, to: &UserId) -> AppResult<()> {
            self.record(format!("request {to}"))
        }
        async fn accept_request(&self, from: &UserId) -> AppResult<()> {
            self.record(format!("accept {from}"))
        }
        async fn decline_request(&self, from: &UserId) -> AppResult<()> {
            self.record(format!("decline {from}"))
        }
        async fn cancel_request(&self, to: &UserId) -> AppResult<()> {
            self.record(format!("cancel {to}"))
        }
    }

    fn synced(api: FakeApi) -> (SyncedConnectionBook, Arc<FakeApi>) {
        let api = Arc::new(api);
        let book = Arc::new(ConnectionBook::new(UserId::from("0")));
        (SyncedConnectionBook::new(book, api.clone()), api)
    }

    #[tokio::test]
    async fn test_successful_calls_keep_local_change() {
        let (synced, api) = synced(FakeApi::default());
        let other = UserId::from("3");

        synced.send_connection_request(&other).await.unwrap();
        assert_eq!(synced.book().connection_status(&other), ConnectionState::Pending);
        synced.cancel_connection_request(&other).await.unwrap();
        assert_eq!(synced.book().connection_status(&other), ConnectionState::None);

        assert_eq!(*api.calls.lock().unwrap(), vec!["request 3", "cancel 3"]);
    }

    #[tokio::test]
    async fn test_failed_call_rolls_back() {
        let (synced, _) = synced(FakeApi {
            fail: true,
            ..FakeApi::default()
        });
        let other = UserId::from("3");

        let err = synced.send_connection_request(&other).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
        assert_eq!(synced.book().connection_status(&other), ConnectionState::None);
        assert!(synced.book().records().is_empty());
    }

    #[tokio::test]
    async fn test_failed_accept_restores_pending() {
        let requester = UserId::from("1");
        let incoming = Connection::pending(requester.clone(), UserId::from("0"));
        let (synced, _) = synced(FakeApi {
            fail: true,
            remote: vec![incoming],
            ..FakeApi::default()
        });
        synced.refresh().await.unwrap();

        assert!(synced.accept_connection_request(&requester).await.is_err());
        assert_eq!(synced.book().connection_status(&requester), ConnectionState::Pending);
        assert_eq!(synced.book().pending_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_local_rule_violation_never_reaches_backend() {
        let (synced, api) = synced(FakeApi::default());
        let err = synced
            .accept_connection_request(&UserId::from("9"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(api.calls.lock().unwrap().is_empty());
    }

    /// Backend whose cancel call fails once `gate` is released.
    #[derive(Debug)]
    struct SlowCancel {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl ConnectionsApi for SlowCancel {
        async fn list_connections(&self) -> AppResult<Vec<Connection>> {
            Ok(Vec::new())
        }
        async fn send_request(&self, _: &UserId) -> AppResult<()> {
            Ok(())
        }
        async fn accept_request(&self, _: &UserId) -> AppResult<()> {
            Ok(())
        }
        async fn decline_request(&self, _: &UserId) -> AppResult<()> {
            Ok(())
        }
        async fn cancel_request(&self, _: &UserId) -> AppResult<()> {
            self.gate.notified().await;
            Err(AppError::service_unavailable("backend down"))
        }
    }

    #[tokio::test]
    async fn test_rollback_never_duplicates_a_pair() {
        let other = UserId::from("3");
        let book = Arc::new(ConnectionBook::new(UserId::from("0")));
        book.send_connection_request(&other).unwrap();

        let gate = Arc::new(Notify::new());
        let synced = SyncedConnectionBook::new(
            Arc::clone(&book),
            Arc::new(SlowCancel {
                gate: Arc::clone(&gate),
            }),
        );

        let cancel = tokio::spawn({
            let synced = synced.clone();
            let other = other.clone();
            async move { synced.cancel_connection_request(&other).await }
        });
        while book.connection_status(&other) != ConnectionState::None {
            tokio::task::yield_now().await;
        }

        let renewed = book.send_connection_request(&other).unwrap();
        gate.notify_one();

        let err = cancel.await.unwrap().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        let records = book.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, renewed.id);
        assert_eq!(book.connection_status(&other), ConnectionState::Pending);
    }
}
