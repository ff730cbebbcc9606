//! The connection record set and its state machine.

use serde::{Deserialize, Serialize};

use gossip_core::error::AppError;
use gossip_core::result::AppResult;
use gossip_core::types::UserId;
use gossip_entity::connection::{Connection, ConnectionState, ConnectionStatus};

/// What a mutation did, so it can be reverted.
///
/// `before` is the record that was replaced or removed; `after` is the
/// record now stored. A fresh request has no `before`; a cancel has no
/// `after`.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    /// Record state prior to the mutation.
    pub before: Option<Connection>,
    /// Record state after the mutation.
    pub after: Option<Connection>,
}

impl Change {
    /// The record now stored.
    pub fn into_after(self) -> AppResult<Connection> {
        self.after
            .ok_or_else(|| AppError::internal("Connection change carried no resulting record"))
    }

    /// The record that was replaced or removed.
    pub fn into_before(self) -> AppResult<Connection> {
        self.before
            .ok_or_else(|| AppError::internal("Connection change carried no previous record"))
    }
}

/// All connection records known locally.
///
/// At most one record exists per unordered pair of users; every mutation
/// keeps it that way. All queries take the perspective of `me`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionGraph {
    records: Vec<Connection>,
}

impl ConnectionGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from existing records.
    pub fn from_records(records: Vec<Connection>) -> Self {
        Self { records }
    }

    /// Every record, in insertion order.
    pub fn records(&self) -> &[Connection] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the graph has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn find_pair(&self, a: &UserId, b: &UserId) -> Option<usize> {
        self.records.iter().position(|c| c.links(a, b))
    }

    fn find_directed(&self, from: &UserId, to: &UserId) -> Option<usize> {
        self.records
            .iter()
            .position(|c| &c.from_user_id == from && &c.to_user_id == to)
    }

    /// Status between `me` and `other`, regardless of who asked.
    pub fn status(&self, me: &UserId, other: &UserId) -> ConnectionState {
        self.find_pair(me, other)
            .map(|i| self.records[i].status.into())
            .unwrap_or(ConnectionState::None)
    }

    /// Whether `me` sent a request to `other`, in any status.
    pub fn is_request_sent_by(&self, me: &UserId, other: &UserId) -> bool {
        self.find_directed(me, other).is_some()
    }

    /// Record a new pending request from `me` to `other`.
    ///
    /// Fails with `Validation` for a request to oneself and `Conflict`
    /// while a pending or accepted record exists for the pair. A declined
    /// record is replaced.
    pub fn send_request(&mut self, me: &UserId, other: &UserId) -> AppResult<Change> {
        if me == other {
            return Err(AppError::validation("Cannot send a connection request to yourself"));
        }

        let before = match self.find_pair(me, other) {
            Some(i) if self.records[i].status == ConnectionStatus::Declined => {
                Some(self.records.remove(i))
            }
            Some(i) => {
                return Err(AppError::conflict(format!(
                    "A connection with user {other} is already {}",
                    self.records[i].status
                )));
            }
            None => None,
        };

        let created = Connection::pending(me.clone(), other.clone());
        self.records.push(created.clone());
        Ok(Change {
            before,
            after: Some(created),
        })
    }

    /// Accept the pending request `other` sent to `me`.
    pub fn accept(&mut self, me: &UserId, other: &UserId) -> AppResult<Change> {
        self.answer(me, other, ConnectionStatus::Accepted)
    }

    /// Decline the pending request `other` sent to `me`.
    pub fn decline(&mut self, me: &UserId, other: &UserId) -> AppResult<Change> {
        self.answer(me, other, ConnectionStatus::Declined)
    }

    fn answer(&mut self, me: &UserId, other: &UserId, next: ConnectionStatus) -> AppResult<Change> {
        let index = self
            .find_directed(other, me)
            .filter(|&i| self.records[i].status.can_transition_to(next))
            .ok_or_else(|| {
                AppError::not_found(format!("No pending request from user {other}"))
            })?;

        let before = self.records[index].clone();
        self.records[index].status = next;
        Ok(Change {
            before: Some(before),
            after: Some(self.records[index].clone()),
        })
    }

    /// Withdraw the pending request `me` sent to `other`.
    ///
    /// `NotFound` when there is no such request, `Conflict` once it has
    /// been answered.
    pub fn cancel(&mut self, me: &UserId, other: &UserId) -> AppResult<Change> {
        let index = self
            .find_directed(me, other)
            .ok_or_else(|| AppError::not_found(format!("No request sent to user {other}")))?;

        let status = self.records[index].status;
        if status != ConnectionStatus::Pending {
            return Err(AppError::conflict(format!(
                "Request to user {other} was already {status}"
            )));
        }

        Ok(Change {
            before: Some(self.records.remove(index)),
            after: None,
        })
    }

    /// Pending requests addressed to `me`.
    pub fn pending_for(&self, me: &UserId) -> Vec<Connection> {
        self.records
            .iter()
            .filter(|c| &c.to_user_id == me && c.status == ConnectionStatus::Pending)
            .cloned()
            .collect()
    }

    /// Accepted records involving `me`.
    pub fn accepted_for(&self, me: &UserId) -> Vec<Connection> {
        self.records
            .iter()
            .filter(|c| c.involves(me) && c.status == ConnectionStatus::Accepted)
            .cloned()
            .collect()
    }

    /// Undo `change`.
    ///
    /// Only applies while the pair still holds exactly what `change` left
    /// behind: the `after` record, or nothing for a cancel. If the pair was
    /// modified since, the graph is left untouched and `Conflict` returned.
    pub fn revert(&mut self, change: &Change) -> AppResult<()> {
        let Some((a, b)) = change
            .after
            .as_ref()
            .or(change.before.as_ref())
            .map(|c| (c.from_user_id.clone(), c.to_user_id.clone()))
        else {
            return Ok(());
        };

        let current = self.find_pair(&a, &b);
        let untouched = match (&change.after, current) {
            (Some(after), Some(i)) => &self.records[i] == after,
            (None, None) => true,
            _ => false,
        };
        if !untouched {
            return Err(AppError::conflict(format!(
                "Connection between users {a} and {b} changed before it could be restored"
            )));
        }

        if let Some(i) = current {
            self.records.remove(i);
        }
        if let Some(before) = &change.before {
            self.records.push(before.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gossip_core::error::ErrorKind;

    fn ids() -> (UserId, UserId, UserId) {
        (UserId::from("0"), UserId::from("1"), UserId::from("2"))
    }

    #[test]
    fn status_is_symmetric() {
        let (me, a, _) = ids();
        let mut graph = ConnectionGraph::new();
        assert_eq!(graph.status(&me, &a), ConnectionState::None);

        graph.send_request(&me, &a).unwrap();
        assert_eq!(graph.status(&me, &a), ConnectionState::Pending);
        assert_eq!(graph.status(&a, &me), ConnectionState::Pending);

        graph.accept(&a, &me).unwrap();
        assert_eq!(graph.status(&me, &a), ConnectionState::Accepted);
        assert_eq!(graph.status(&a, &me), ConnectionState::Accepted);
    }

    #[test]
    fn request_is_visible_to_both_sides() {
        let (me, a, _) = ids();
        let mut graph = ConnectionGraph::new();
        graph.send_request(&me, &a).unwrap();

        assert!(graph.is_request_sent_by(&me, &a));
        assert!(!graph.is_request_sent_by(&a, &me));
        assert_eq!(graph.pending_for(&a).len(), 1);
        assert!(graph.pending_for(&me).is_empty());
    }

    #[test]
    fn accept_moves_request_out_of_pending() {
        let (me, a, _) = ids();
        let mut graph = ConnectionGraph::new();
        graph.send_request(&a, &me).unwrap();
        graph.accept(&me, &a).unwrap();

        assert!(graph.pending_for(&me).is_empty());
        let accepted = graph.accepted_for(&me);
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].counterpart(&me), Some(&a));
        assert_eq!(graph.accepted_for(&a).len(), 1);
    }

    #[test]
    fn cancel_removes_pending_request() {
        let (me, a, _) = ids();
        let mut graph = ConnectionGraph::new();
        graph.send_request(&me, &a).unwrap();
        graph.cancel(&me, &a).unwrap();

        assert_eq!(graph.status(&me, &a), ConnectionState::None);
        assert!(!graph.is_request_sent_by(&me, &a));
        assert!(graph.is_empty());
    }

    #[test]
    fn self_and_duplicate_requests_are_rejected() {
        let (me, a, _) = ids();
        let mut graph = ConnectionGraph::new();

        let err = graph.send_request(&me, &me).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        graph.send_request(&me, &a).unwrap();
        assert_eq!(graph.send_request(&me, &a).unwrap_err().kind, ErrorKind::Conflict);
        assert_eq!(graph.send_request(&a, &me).unwrap_err().kind, ErrorKind::Conflict);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn declined_request_can_be_renewed() {
        let (me, a, _) = ids();
        let mut graph = ConnectionGraph::new();
        graph.send_request(&me, &a).unwrap();
        graph.decline(&a, &me).unwrap();
        assert_eq!(graph.status(&me, &a), ConnectionState::Declined);

        let change = graph.send_request(&me, &a).unwrap();
        assert_eq!(
            change.before.map(|c| c.status),
            Some(ConnectionStatus::Declined)
        );
        assert_eq!(graph.status(&me, &a), ConnectionState::Pending);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn answers_need_a_pending_inbound_request() {
        let (me, a, b) = ids();
        let mut graph = ConnectionGraph::new();

        assert_eq!(graph.accept(&me, &a).unwrap_err().kind, ErrorKind::NotFound);

        graph.send_request(&me, &a).unwrap();
        assert_eq!(
            graph.accept(&me, &a).unwrap_err().kind,
            ErrorKind::NotFound,
            "the requester cannot accept its own request"
        );

        graph.send_request(&b, &me).unwrap();
        graph.decline(&me, &b).unwrap();
        assert_eq!(graph.accept(&me, &b).unwrap_err().kind, ErrorKind::NotFound);
        assert_eq!(graph.status(&me, &b), ConnectionState::Declined);
    }

    #[test]
    fn cancel_rules() {
        let (me, a, _) = ids();
        let mut graph = ConnectionGraph::new();
        assert_eq!(graph.cancel(&me, &a).unwrap_err().kind, ErrorKind::NotFound);

        graph.send_request(&me, &a).unwrap();
        graph.accept(&a, &me).unwrap();
        assert_eq!(graph.cancel(&me, &a).unwrap_err().kind, ErrorKind::Conflict);
        assert_eq!(graph.status(&me, &a), ConnectionState::Accepted);
    }

    #[test]
    fn revert_restores_previous_state() {
        let (me, a, b) = ids();
        let mut graph = ConnectionGraph::new();
        graph.send_request(&a, &me).unwrap();
        graph.send_request(&me, &b).unwrap();
        let original = graph.clone();

        let accepted = graph.accept(&me, &a).unwrap();
        graph.revert(&accepted).unwrap();
        assert_eq!(graph.status(&me, &a), ConnectionState::Pending);

        let cancelled = graph.cancel(&me, &b).unwrap();
        graph.revert(&cancelled).unwrap();
        assert_eq!(graph.status(&me, &b), ConnectionState::Pending);

        let fresh = graph.send_request(&me, &UserId::from("7")).unwrap();
        graph.revert(&fresh).unwrap();
        assert_eq!(graph.len(), original.len());
    }

    #[test]
    fn revert_refuses_when_pair_moved_on() {
        let (me, a, _) = ids();
        let mut graph = ConnectionGraph::new();
        graph.send_request(&me, &a).unwrap();

        let cancelled = graph.cancel(&me, &a).unwrap();
        let renewed = graph.send_request(&me, &a).unwrap();
        assert_eq!(graph.revert(&cancelled).unwrap_err().kind, ErrorKind::Conflict);
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.records()[0].id, renewed.after.as_ref().unwrap().id);

        graph.accept(&a, &me).unwrap();
        assert_eq!(graph.revert(&renewed).unwrap_err().kind, ErrorKind::Conflict);
        assert_eq!(graph.status(&me, &a), ConnectionState::Accepted);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn serializes_as_plain_list() {
        let (me, a, _) = ids();
        let mut graph = ConnectionGraph::new();
        graph.send_request(&me, &a).unwrap();

        let json = serde_json::to_value(&graph).unwrap();
        assert!(json.is_array());
        let back: ConnectionGraph = serde_json::from_value(json).unwrap();
        assert_eq!(back, graph);
    }
}
