//! Shared test helpers for integration tests.

use std::sync::{Arc, Mutex};

use gossip_auth::{MockAuthGateway, SessionStore};
use gossip_core::config::presence::PresenceConfig;
use gossip_core::traits::KeyValueStore;
use gossip_realtime::{EventKind, PresenceChannel, PresenceEvent};
use gossip_storage::FileStore;
use tempfile::TempDir;

/// Session key used by every test store.
pub const SESSION_KEY: &str = "chatUser";

/// A file-backed store in a fresh temporary directory.
pub struct TestDisk {
    pub dir: TempDir,
    pub store: Arc<dyn KeyValueStore>,
}

impl TestDisk {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::new(dir.path()).await.unwrap());
        Self { dir, store }
    }

    /// A session store over this disk talking to `gateway`.
    pub fn sessions(&self, gateway: Arc<MockAuthGateway>) -> SessionStore {
        SessionStore::new(gateway, Arc::clone(&self.store), SESSION_KEY)
    }
}

/// Simulator settings with a fixed seed and a busy roster.
pub fn busy_presence(seed: u64) -> PresenceConfig {
    PresenceConfig {
        connect_delay_ms: 500,
        tick_interval_ms: 1_000,
        select_probability: 1.0,
        online_probability: 0.5,
        seed: Some(seed),
        ..PresenceConfig::default()
    }
}

/// Record every event `channel` emits.
pub fn record(channel: &dyn PresenceChannel) -> Arc<Mutex<Vec<PresenceEvent>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    for kind in [
        EventKind::Connect,
        EventKind::Disconnect,
        EventKind::NewMessage,
        EventKind::UserStatus,
    ] {
        let log = Arc::clone(&log);
        channel
            .listeners()
            .on(kind, move |e| log.lock().unwrap().push(e.clone()));
    }
    log
}
