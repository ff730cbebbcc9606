//! Two users sharing one persisted connection graph.

use gossip_core::types::UserId;
use gossip_entity::connection::ConnectionState;
use gossip_service::ConnectionBook;

use crate::helpers::TestDisk;

const KEY: &str = "connections";

#[tokio::test]
async fn test_request_accept_round_trip_through_storage() {
    let disk = TestDisk::new().await;
    let sarah = UserId::from("1");
    let michael = UserId::from("2");

    let book = ConnectionBook::load(disk.store.as_ref(), KEY, sarah.clone()).await.unwrap();
    book.send_connection_request(&michael).unwrap();
    book.save(disk.store.as_ref(), KEY).await.unwrap();

    let book = ConnectionBook::load(disk.store.as_ref(), KEY, michael.clone()).await.unwrap();
    assert_eq!(book.connection_status(&sarah), ConnectionState::Pending);
    assert!(!book.is_request_sent_by_current_user(&sarah));
    assert_eq!(book.pending_requests().len(), 1);
    book.accept_connection_request(&sarah).unwrap();
    book.save(disk.store.as_ref(), KEY).await.unwrap();

    let book = ConnectionBook::load(disk.store.as_ref(), KEY, sarah.clone()).await.unwrap();
    assert_eq!(book.connection_status(&michael), ConnectionState::Accepted);
    assert!(book.is_request_sent_by_current_user(&michael));
    assert_eq!(book.connected_user_ids(), vec![michael]);
    assert!(book.pending_requests().is_empty());
}

#[tokio::test]
async fn test_cancelled_request_disappears_for_both_sides() {
    let disk = TestDisk::new().await;
    let me = UserId::from("0");
    let other = UserId::from("4");

    let book = ConnectionBook::load(disk.store.as_ref(), KEY, me.clone()).await.unwrap();
    book.send_connection_request(&other).unwrap();
    book.cancel_connection_request(&other).unwrap();
    book.save(disk.store.as_ref(), KEY).await.unwrap();

    let theirs = ConnectionBook::load(disk.store.as_ref(), KEY, other).await.unwrap();
    assert_eq!(theirs.connection_status(&me), ConnectionState::None);
    assert!(theirs.pending_requests().is_empty());
}
