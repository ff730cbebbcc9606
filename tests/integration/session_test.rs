//! Session persistence across restarts.

use std::sync::Arc;

use gossip_auth::MockAuthGateway;
use gossip_core::error::ErrorKind;

use crate::helpers::{SESSION_KEY, TestDisk};

#[tokio::test]
async fn test_session_survives_restart() {
    let disk = TestDisk::new().await;
    let gateway = Arc::new(MockAuthGateway::new());

    let first = disk.sessions(Arc::clone(&gateway));
    assert!(first.login("1", "user1password").await);
    let token = first.token().await.unwrap();
    assert!(disk.dir.path().join(format!("{SESSION_KEY}.json")).exists());

    let second = disk.sessions(gateway);
    let restored = second.restore().await.unwrap().unwrap();
    assert_eq!(restored.user.name, "Sarah Johnson");
    assert_eq!(second.token().await.as_deref(), Some(token.as_str()));
    assert!(second.is_authenticated().await);
}

#[tokio::test]
async fn test_corrupt_snapshot_starts_signed_out() {
    let disk = TestDisk::new().await;
    disk.store.set(SESSION_KEY, "{ not json").await.unwrap();

    let sessions = disk.sessions(Arc::new(MockAuthGateway::new()));
    assert!(sessions.restore().await.unwrap().is_none());
    assert!(!sessions.is_authenticated().await);
    assert!(!disk.store.exists(SESSION_KEY).await.unwrap());
}

#[tokio::test]
async fn test_logout_revokes_and_forgets() {
    let disk = TestDisk::new().await;
    let gateway = Arc::new(MockAuthGateway::new());
    let sessions = disk.sessions(Arc::clone(&gateway));

    let session = sessions.try_login("2", "user2password").await.unwrap();
    assert!(gateway.is_token_active(&session.token));

    sessions.logout().await;
    assert!(!gateway.is_token_active(&session.token));
    assert!(sessions.current_user().await.is_none());

    let after_restart = disk.sessions(gateway);
    assert!(after_restart.restore().await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_login_leaves_previous_state_untouched() {
    let disk = TestDisk::new().await;
    let sessions = disk.sessions(Arc::new(MockAuthGateway::new()));

    let err = sessions.try_login("1", "wrong").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);
    assert!(!sessions.is_authenticated().await);
    assert!(!disk.store.exists(SESSION_KEY).await.unwrap());
}
