//! Timer-driven presence simulator.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use gossip_core::config::presence::PresenceConfig;
use gossip_core::error::AppError;
use gossip_core::result::AppResult;
use gossip_core::types::UserId;
use gossip_entity::message::Message;

use super::PresenceChannel;
use crate::event::PresenceEvent;
use crate::listener::ListenerRegistry;

/// State shared between the channel and its background task.
#[derive(Debug)]
struct Shared {
    listeners: ListenerRegistry,
    connected: AtomicBool,
    rng: Mutex<StdRng>,
}

#[derive(Debug)]
struct Running {
    cancel: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Presence channel that fabricates status changes on a timer and echoes
/// sent messages back as `NEW_MESSAGE`.
///
/// On every tick one draw decides whether anything happens
/// (`select_probability`); if so a roster user is picked and reported
/// online with `online_probability`.
#[derive(Debug)]
pub struct SimulatedChannel {
    config: PresenceConfig,
    shared: Arc<Shared>,
    running: tokio::sync::Mutex<Option<Running>>,
}

impl SimulatedChannel {
    /// Create a simulator; the RNG is seeded from `config.seed` or the OS.
    pub fn new(config: PresenceConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, rng)
    }

    /// Create a simulator driven by an explicit RNG.
    pub fn with_rng(config: PresenceConfig, rng: StdRng) -> Self {
        Self {
            config,
            shared: Arc::new(Shared {
                listeners: ListenerRegistry::new(),
                connected: AtomicBool::new(false),
                rng: Mutex::new(rng),
            }),
            running: tokio::sync::Mutex::new(None),
        }
    }

    fn spawn_simulation(&self) -> Running {
        let (cancel, cancel_rx) = watch::channel(false);
        let shared = Arc::clone(&self.shared);
        let config = self.config.clone();
        let handle = tokio::spawn(simulate(shared, config, cancel_rx));
        Running { cancel, handle }
    }
}

/// One simulation step: maybe produce a status change.
fn draw_status(rng: &mut StdRng, config: &PresenceConfig) -> Option<(UserId, bool)> {
    if config.roster.is_empty() || rng.random::<f64>() >= config.select_probability {
        return None;
    }
    let index = rng.random_range(0..config.roster.len());
    let online = rng.random::<f64>() < config.online_probability;
    Some((UserId::new(config.roster[index].clone()), online))
}

async fn simulate(shared: Arc<Shared>, config: PresenceConfig, mut cancel: watch::Receiver<bool>) {
    let period = config.tick_interval();
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    debug!(tick_ms = config.tick_interval_ms, "Presence simulation started");

    loop {
        tokio::select! {
            changed = cancel.changed() => {
                if changed.is_err() || *cancel.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                let drawn = {
                    let mut rng = shared.rng.lock().unwrap_or_else(|p| p.into_inner());
                    draw_status(&mut rng, &config)
                };
                if let Some((user_id, online)) = drawn {
                    if !shared.connected.load(Ordering::SeqCst) {
                        break;
                    }
                    debug!(user_id = %user_id, online, "Simulated status change");
                    shared.listeners.emit(&PresenceEvent::user_status(user_id, online));
                }
            }
        }
    }

    debug!("Presence simulation stopped");
}

#[async_trait]
impl PresenceChannel for SimulatedChannel {
    async fn connect(&self) -> AppResult<()> {
        let mut running = self.running.lock().await;
        if running.is_some() {
            debug!("Simulated channel already connected");
            return Ok(());
        }
        self.config.validate()?;

        time::sleep(self.config.connect_delay()).await;

        self.shared.connected.store(true, Ordering::SeqCst);
        info!(roster = self.config.roster.len(), "Simulated presence channel connected");
        self.shared.listeners.emit(&PresenceEvent::Connect);

        *running = Some(self.spawn_simulation());
        Ok(())
    }

    async fn disconnect(&self) -> AppResult<()> {
        let Some(Running { cancel, handle }) = self.running.lock().await.take() else {
            return Ok(());
        };

        self.shared.connected.store(false, Ordering::SeqCst);
        let _ = cancel.send(true);
        if let Err(e) = handle.await {
            warn!(error = %e, "Presence simulation task ended abnormally");
        }

        info!("Simulated presence channel disconnected");
        self.shared.listeners.emit(&PresenceEvent::Disconnect);
        Ok(())
    }

    async fn send_message(&self, message: Message) -> AppResult<()> {
        if !self.is_connected() {
            warn!(message_id = %message.id, "Cannot send message: channel not connected");
            return Err(AppError::service_unavailable(
                "Presence channel is not connected",
            ));
        }
        self.shared.listeners.emit(&PresenceEvent::NewMessage(message));
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::SeqCst)
    }

    fn listeners(&self) -> &ListenerRegistry {
        &self.shared.listeners
    }

    fn transport_name(&self) -> &'static str {
        "simulated"
    }
}
