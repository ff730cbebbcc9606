//! # gossip-service
//!
//! Client-side domain services for GossipGo. Each service owns local
//! state and, where a backend exists, talks to it through one of the
//! traits in [`remote`].
//!
//! - [`connection`]: the connection graph and its current-user view
//! - [`directory`]: user listing and search with offline fallback
//! - [`chat`]: chat list filtering, ordering, and archiving
//! - [`messages`]: per-chat message history
//! - [`seed`]: sample data for demos and offline use

pub mod chat;
pub mod connection;
pub mod directory;
pub mod messages;
pub mod remote;
pub mod seed;

pub use chat::{ChatFilter, ChatList};
pub use connection::{ConnectionBook, ConnectionGraph, SyncedConnectionBook};
pub use directory::UserDirectory;
pub use messages::MessageLog;
pub use remote::{ChatsApi, ConnectionsApi, UserSource};
