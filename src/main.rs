//! GossipGo client runtime.
//!
//! Wires the client crates together: restores the stored session, opens
//! the presence channel, keeps a presence roster and message log current,
//! and logs every event until Ctrl-C.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use gossip_auth::SessionStore;
use gossip_client::{ApiClient, select_gateway};
use gossip_core::config::AppConfig;
use gossip_core::error::AppError;
use gossip_realtime::{EventKind, PresenceEvent, PresenceRoster, build_channel};
use gossip_service::{MessageLog, seed};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from `config/` and the environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let dir = std::env::var("GOSSIP_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let env = std::env::var("GOSSIP_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load_from(std::path::Path::new(&dir), &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main client run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting GossipGo v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Local store + session ────────────────────────────
    let store = gossip_storage::build_store(&config.session).await?;
    let api = Arc::new(ApiClient::new(&config.api)?);
    let session = SessionStore::new(
        select_gateway(config.session.gateway, &api),
        Arc::clone(&store),
        config.session.storage_key.clone(),
    );
    match session.restore().await? {
        Some(restored) => {
            api.set_token(restored.token.clone());
            tracing::info!(user = %restored.user.name, "Session restored");
        }
        None => tracing::info!("No stored session; running signed out"),
    }

    // ── Step 2: Presence channel ─────────────────────────────────
    let channel = build_channel(&config.presence);
    tracing::info!(transport = channel.transport_name(), "Presence channel selected");

    // ── Step 3: Roster, message log, event logging ───────────────
    let roster = Arc::new(PresenceRoster::new());
    roster.seed(&seed::users());
    roster.attach(channel.listeners());

    let messages = Arc::new(MessageLog::with_messages(seed::messages()));
    messages.attach(channel.listeners());

    for kind in [
        EventKind::Connect,
        EventKind::Disconnect,
        EventKind::NewMessage,
        EventKind::UserStatus,
    ] {
        channel.listeners().on(kind, log_event);
    }

    // ── Step 4: Connect and wait for Ctrl-C ──────────────────────
    channel.connect().await?;
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| AppError::internal(format!("Failed to listen for Ctrl-C: {e}")))?;
    tracing::info!("Shutdown signal received");

    // ── Step 5: Disconnect ───────────────────────────────────────
    channel.disconnect().await?;
    tracing::info!(
        online = roster.online_ids().len(),
        "Presence channel closed"
    );
    Ok(())
}

fn log_event(event: &PresenceEvent) {
    match event {
        PresenceEvent::Connect => tracing::info!("Presence connected"),
        PresenceEvent::Disconnect => tracing::info!("Presence disconnected"),
        PresenceEvent::NewMessage(m) => {
            tracing::info!(message_id = %m.id, user_id = %m.user_id, text = %m.text, "New message");
        }
        PresenceEvent::UserStatus(update) => {
            tracing::info!(user_id = %update.user_id, online = update.is_online, "User status");
        }
    }
}
