//! Directory fallback with live presence.

use std::sync::Arc;

use async_trait::async_trait;
use gossip_core::error::AppError;
use gossip_core::result::AppResult;
use gossip_core::types::UserId;
use gossip_entity::user::User;
use gossip_realtime::{PresenceEvent, PresenceRoster};
use gossip_service::UserSource;
use gossip_service::directory::{Origin, UserDirectory};
use gossip_service::seed;

#[derive(Debug)]
struct Offline;

#[async_trait]
impl UserSource for Offline {
    async fn list_users(&self) -> AppResult<Vec<User>> {
        Err(AppError::service_unavailable("connection refused"))
    }
    async fn search_users(&self, _: &str) -> AppResult<Vec<User>> {
        Err(AppError::service_unavailable("connection refused"))
    }
    async fn users_by_ids(&self, _: &[UserId]) -> AppResult<Vec<User>> {
        Err(AppError::service_unavailable("connection refused"))
    }
}

#[tokio::test]
async fn test_offline_directory_reflects_presence_events() {
    let roster = Arc::new(PresenceRoster::new());
    roster.apply(&PresenceEvent::user_status(UserId::from("5"), true));
    roster.apply(&PresenceEvent::user_status(UserId::from("1"), false));

    let directory = UserDirectory::new(Arc::new(Offline), seed::users())
        .for_user(UserId::from("2"))
        .with_presence(roster);
    let listing = directory.list_users().await;

    assert_eq!(listing.origin, Origin::Fallback);
    let names: Vec<&str> = listing.users.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Carlos Rodriguez", "Emma Wilson", "Aisha Patel", "Sarah Johnson"]
    );
}
