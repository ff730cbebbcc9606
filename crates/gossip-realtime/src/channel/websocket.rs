//! Presence channel over a real WebSocket push service.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use gossip_core::error::{AppError, ErrorKind};
use gossip_core::result::AppResult;
use gossip_entity::message::Message;

use super::PresenceChannel;
use crate::event::PresenceEvent;
use crate::listener::ListenerRegistry;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Default)]
struct Shared {
    listeners: ListenerRegistry,
    connected: AtomicBool,
}

#[derive(Debug)]
struct Running {
    cancel: watch::Sender<bool>,
    outbound: mpsc::UnboundedSender<String>,
    handle: JoinHandle<()>,
}

/// Presence channel backed by a WebSocket connection.
///
/// Inbound text frames are JSON `{ "type": ..., "data": ... }` documents
/// and are dispatched to listeners; `send_message` publishes a
/// `new_message` frame instead of echoing locally. `connect` and
/// `disconnect` are produced locally from the socket lifecycle; frames of
/// those kinds sent by the server are ignored.
#[derive(Debug)]
pub struct WebSocketChannel {
    url: String,
    shared: Arc<Shared>,
    running: tokio::sync::Mutex<Option<Running>>,
}

impl WebSocketChannel {
    /// Create a channel for `url` (`ws://` or `wss://`). Nothing is dialed
    /// until [`connect`](PresenceChannel::connect).
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            shared: Arc::new(Shared::default()),
            running: tokio::sync::Mutex::new(None),
        }
    }

    /// The endpoint this channel dials.
    pub fn url(&self) -> &str {
        &self.url
    }
}

fn dispatch_frame(shared: &Shared, text: &str) {
    match serde_json::from_str::<PresenceEvent>(text) {
        Ok(PresenceEvent::Connect | PresenceEvent::Disconnect) => {
            debug!("Ignoring lifecycle frame from server");
        }
        Ok(event) => shared.listeners.emit(&event),
        Err(e) => warn!(error = %e, "Dropping undecodable frame"),
    }
}

async fn pump(
    socket: Socket,
    shared: Arc<Shared>,
    mut outbound: mpsc::UnboundedReceiver<String>,
    mut cancel: watch::Receiver<bool>,
) {
    let (mut sink, mut stream) = socket.split();
    let mut closed_by_peer = false;

    loop {
        tokio::select! {
            changed = cancel.changed() => {
                if changed.is_err() || *cancel.borrow() {
                    let _ = sink.send(WsMessage::Close(None)).await;
                    break;
                }
            }
            Some(frame) = outbound.recv() => {
                if let Err(e) = sink.send(WsMessage::Text(frame.into())).await {
                    warn!(error = %e, "WebSocket write failed");
                    closed_by_peer = true;
                    break;
                }
            }
            incoming = stream.next() => match incoming {
                Some(Ok(WsMessage::Text(text))) => dispatch_frame(&shared, text.as_str()),
                Some(Ok(WsMessage::Close(_))) | None => {
                    closed_by_peer = true;
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(error = %e, "WebSocket read failed");
                    closed_by_peer = true;
                    break;
                }
            }
        }
    }

    if closed_by_peer && shared.connected.swap(false, Ordering::SeqCst) {
        info!("WebSocket presence channel closed by peer");
        shared.listeners.emit(&PresenceEvent::Disconnect);
    }
}

#[async_trait]
impl PresenceChannel for WebSocketChannel {
    async fn connect(&self) -> AppResult<()> {
        let mut running = self.running.lock().await;
        if running.is_some() {
            if self.is_connected() {
                debug!("WebSocket channel already connected");
                return Ok(());
            }
            if let Some(stale) = running.take() {
                let _ = stale.handle.await;
            }
        }

        let (socket, _) = connect_async(self.url.as_str()).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ServiceUnavailable,
                format!("Failed to connect to {}", self.url),
                e,
            )
        })?;

        self.shared.connected.store(true, Ordering::SeqCst);
        info!(url = %self.url, "WebSocket presence channel connected");
        self.shared.listeners.emit(&PresenceEvent::Connect);

        let (cancel, cancel_rx) = watch::channel(false);
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(pump(
            socket,
            Arc::clone(&self.shared),
            outbound_rx,
            cancel_rx,
        ));
        *running = Some(Running {
            cancel,
            outbound,
            handle,
        });
        Ok(())
    }

    async fn disconnect(&self) -> AppResult<()> {
        let Some(Running { cancel, handle, .. }) = self.running.lock().await.take() else {
            return Ok(());
        };

        let _ = cancel.send(true);
        if let Err(e) = handle.await {
            warn!(error = %e, "WebSocket task ended abnormally");
        }

        if self.shared.connected.swap(false, Ordering::SeqCst) {
            info!("WebSocket presence channel disconnected");
            self.shared.listeners.emit(&PresenceEvent::Disconnect);
        }
        Ok(())
    }

    async fn send_message(&self, message: Message) -> AppResult<()> {
        let outbound = match self.running.lock().await.as_ref() {
            Some(running) if self.is_connected() => running.outbound.clone(),
            _ => {
                warn!(message_id = %message.id, "Cannot send message: channel not connected");
                return Err(AppError::service_unavailable(
                    "Presence channel is not connected",
                ));
            }
        };

        let frame = serde_json::to_string(&PresenceEvent::NewMessage(message))?;
        outbound
            .send(frame)
            .map_err(|_| AppError::service_unavailable("WebSocket writer has stopped"))
    }

    fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::SeqCst)
    }

    fn listeners(&self) -> &ListenerRegistry {
        &self.shared.listeners
    }

    fn transport_name(&self) -> &'static str {
        "websocket"
    }
}
