//! # gossip-realtime
//!
//! Presence channel for the GossipGo client. Provides:
//!
//! - Typed presence events (`CONNECT`, `DISCONNECT`, `NEW_MESSAGE`, `USER_STATUS`)
//! - A listener registry with ordered, synchronous dispatch
//! - A timer-driven simulator and a WebSocket transport behind one trait
//! - A presence roster that folds status events into per-user online flags

pub mod channel;
pub mod event;
pub mod listener;
pub mod presence;

use std::sync::Arc;

use gossip_core::config::presence::{PresenceConfig, TransportKind};

pub use channel::{PresenceChannel, SimulatedChannel, WebSocketChannel};
pub use event::{EventKind, PresenceEvent, UserStatusUpdate};
pub use listener::{ListenerId, ListenerRegistry};
pub use presence::PresenceRoster;

/// Build the channel selected by configuration.
pub fn build_channel(config: &PresenceConfig) -> Arc<dyn PresenceChannel> {
    match config.transport {
        TransportKind::Simulated => Arc::new(SimulatedChannel::new(config.clone())),
        TransportKind::Websocket => Arc::new(WebSocketChannel::new(config.url.clone())),
    }
}
