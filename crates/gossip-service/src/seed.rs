//! Sample data for demos and offline use.
//!
//! The user list doubles as the directory fallback when the backend is
//! unreachable. Chat timestamps are relative to the `now` passed in, so a
//! demo always looks fresh.

use chrono::{DateTime, Duration, Utc};

use gossip_core::types::{ChatId, ConnectionId, MessageId, UserId};
use gossip_entity::chat::ChatSummary;
use gossip_entity::connection::{Connection, ConnectionStatus};
use gossip_entity::message::Message;
use gossip_entity::user::User;

/// 2023-05-03T10:00:00Z, start of the sample conversation.
const CONVERSATION_START: i64 = 1_683_108_000;

fn avatar(img: u32) -> String {
    format!("https://i.pravatar.cc/150?img={img}")
}

/// The five sample users, in id order.
pub fn users() -> Vec<User> {
    [
        ("1", "Sarah Johnson", 1, true),
        ("2", "Michael Chen", 8, true),
        ("3", "Aisha Patel", 5, false),
        ("4", "Carlos Rodriguez", 3, true),
        ("5", "Emma Wilson", 9, false),
    ]
    .into_iter()
    .map(|(id, name, img, online)| {
        User::new(id, name)
            .with_avatar(avatar(img))
            .with_online(online)
    })
    .collect()
}

/// The local demo identity.
pub fn current_user() -> User {
    User::new("0", "You").with_avatar(avatar(11)).with_online(true)
}

/// The sample coffee-chat conversation, in `chat1`.
pub fn messages() -> Vec<Message> {
    let start = DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(CONVERSATION_START);
    let chat = ChatId::from("chat1");

    [
        ("m1", "1", 0, "Hey everyone! Who's up for a virtual coffee chat?"),
        ("m2", "4", 2, "Count me in! I could use a break from coding all morning."),
        ("m3", "2", 5, "Same here! What time are you thinking?"),
        (
            "m4",
            "1",
            7,
            "How about 2pm? That gives everyone time to grab their beverage of choice.",
        ),
        ("m5", "0", 9, "Sounds perfect! I just made a fresh pot of coffee."),
        ("m6", "2", 10, "Great! Looking forward to catching up with everyone."),
    ]
    .into_iter()
    .map(|(id, user, minute, text)| Message {
        id: MessageId::from(id),
        chat_id: Some(chat.clone()),
        user_id: UserId::from(user),
        text: text.to_string(),
        timestamp: start + Duration::minutes(minute),
    })
    .collect()
}

/// The sample chat list, stamped relative to `now`.
pub fn chats(now: DateTime<Utc>) -> Vec<ChatSummary> {
    let ids = |list: &[&str]| list.iter().map(|&id| UserId::from(id)).collect::<Vec<_>>();

    vec![
        ChatSummary {
            id: ChatId::from("chat1"),
            name: "Marketing Team".to_string(),
            last_message: "Let's discuss the new campaign".to_string(),
            timestamp: now - Duration::minutes(5),
            unread_count: 3,
            is_group: true,
            participants: ids(&["1", "2", "3", "4"]),
            avatar: None,
            archived: false,
        },
        ChatSummary {
            id: ChatId::from("chat2"),
            name: "Sarah Johnson".to_string(),
            last_message: "What time is the meeting?".to_string(),
            timestamp: now - Duration::minutes(30),
            unread_count: 0,
            is_group: false,
            participants: ids(&["1", "2"]),
            avatar: Some(avatar(1)),
            archived: false,
        },
        ChatSummary {
            id: ChatId::from("chat3"),
            name: "Product Discussion".to_string(),
            last_message: "The new design looks great!".to_string(),
            timestamp: now - Duration::hours(2),
            unread_count: 0,
            is_group: true,
            participants: ids(&["2", "3", "5"]),
            avatar: None,
            archived: false,
        },
        ChatSummary {
            id: ChatId::from("chat4"),
            name: "Michael Chen".to_string(),
            last_message: "I'll send the documents tomorrow".to_string(),
            timestamp: now - Duration::hours(5),
            unread_count: 1,
            is_group: false,
            participants: ids(&["3", "5"]),
            avatar: Some(avatar(8)),
            archived: false,
        },
    ]
}

/// Sample connection records around the demo identity: one accepted
/// contact, one request waiting for an answer in each direction, and one
/// declined request.
pub fn connections(now: DateTime<Utc>) -> Vec<Connection> {
    [
        ("c1", "2", "0", ConnectionStatus::Accepted, 72),
        ("c2", "1", "0", ConnectionStatus::Pending, 3),
        ("c3", "0", "3", ConnectionStatus::Pending, 1),
        ("c4", "5", "0", ConnectionStatus::Declined, 48),
    ]
    .into_iter()
    .map(|(id, from, to, status, hours_ago)| Connection {
        id: ConnectionId::from(id),
        from_user_id: UserId::from(from),
        to_user_id: UserId::from(to),
        status,
        created_at: now - Duration::hours(hours_ago),
    })
    .collect()
}
