//! Presence channel driving the roster and the message log.

use std::sync::Arc;
use std::time::Duration;

use gossip_core::types::{ChatId, UserId};
use gossip_entity::message::Message;
use gossip_realtime::{PresenceChannel, PresenceEvent, PresenceRoster, SimulatedChannel};
use gossip_service::{MessageLog, seed};

use crate::helpers::{busy_presence, record};

#[tokio::test(start_paused = true)]
async fn test_roster_tracks_simulated_statuses() {
    let channel = SimulatedChannel::new(busy_presence(11));
    let roster = Arc::new(PresenceRoster::new());
    roster.seed(&seed::users());
    roster.attach(channel.listeners());
    let events = record(&channel);

    channel.connect().await.unwrap();
    tokio::time::sleep(Duration::from_millis(5_500)).await;
    channel.disconnect().await.unwrap();

    let log = events.lock().unwrap().clone();
    assert_eq!(log.first(), Some(&PresenceEvent::Connect));
    assert_eq!(log.last(), Some(&PresenceEvent::Disconnect));

    let statuses: Vec<(UserId, bool)> = log
        .iter()
        .filter_map(|e| match e {
            PresenceEvent::UserStatus(u) => Some((u.user_id.clone(), u.is_online)),
            _ => None,
        })
        .collect();
    assert_eq!(statuses.len(), 5, "one change per tick at probability 1");
    let (last_user, last_online) = statuses.last().unwrap().clone();
    assert_eq!(roster.is_online(&last_user), Some(last_online));
}

#[tokio::test(start_paused = true)]
async fn test_no_events_after_disconnect() {
    let channel = SimulatedChannel::new(busy_presence(3));
    let events = record(&channel);

    channel.connect().await.unwrap();
    tokio::time::sleep(Duration::from_millis(2_500)).await;
    channel.disconnect().await.unwrap();
    let seen = events.lock().unwrap().len();

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(events.lock().unwrap().len(), seen);
    assert!(!channel.is_connected());
}

#[tokio::test(start_paused = true)]
async fn test_sent_messages_reach_the_log() {
    let channel = SimulatedChannel::new(busy_presence(5));
    let log = Arc::new(MessageLog::with_messages(seed::messages()));
    log.attach(channel.listeners());

    let chat = ChatId::from("chat1");
    let message = Message::new(UserId::from("0"), "On my way").in_chat(chat.clone());
    assert!(channel.send_message(message.clone()).await.is_err());

    channel.connect().await.unwrap();
    channel.send_message(message.clone()).await.unwrap();
    channel.disconnect().await.unwrap();

    assert_eq!(log.count(&chat), 7);
    assert_eq!(log.latest(&chat), Some(message));
}
