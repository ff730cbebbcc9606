//! The presence channel seam and its transports.

pub mod simulated;
pub mod websocket;

use async_trait::async_trait;

use gossip_core::result::AppResult;
use gossip_entity::message::Message;

use crate::listener::ListenerRegistry;

pub use simulated::SimulatedChannel;
pub use websocket::WebSocketChannel;

/// A duplex channel reporting presence and message events.
///
/// Each channel is an explicit object with its own lifecycle: `connect`
/// starts it, `disconnect` stops it, and after `disconnect` returns no
/// further events reach listeners.
#[async_trait]
pub trait PresenceChannel: Send + Sync + std::fmt::Debug {
    /// Connect. Emits `CONNECT` once on success; a no-op when already connected.
    async fn connect(&self) -> AppResult<()>;

    /// Disconnect. Emits `DISCONNECT`; a no-op when idle.
    async fn disconnect(&self) -> AppResult<()>;

    /// Send a chat message over the channel.
    ///
    /// Fails with `ServiceUnavailable` when the channel is not connected.
    async fn send_message(&self, message: Message) -> AppResult<()>;

    /// Whether the channel is currently connected.
    fn is_connected(&self) -> bool;

    /// Listeners attached to this channel.
    fn listeners(&self) -> &ListenerRegistry;

    /// Short transport name for logs.
    fn transport_name(&self) -> &'static str;
}
