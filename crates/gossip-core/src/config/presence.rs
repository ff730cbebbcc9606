//! Presence channel configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Transport backing the presence channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Timer-driven simulator that fabricates status changes.
    Simulated,
    /// A real push service over WebSocket.
    Websocket,
}

/// Presence channel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceConfig {
    /// Which transport to construct.
    #[serde(default = "default_transport")]
    pub transport: TransportKind,
    /// WebSocket endpoint, used by the `websocket` transport.
    #[serde(default = "default_url")]
    pub url: String,
    /// Delay before a simulated connect completes, in milliseconds.
    #[serde(default = "default_connect_delay")]
    pub connect_delay_ms: u64,
    /// Interval between simulated status draws, in milliseconds.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Chance that a tick produces a status event at all.
    #[serde(default = "default_select_probability")]
    pub select_probability: f64,
    /// Chance that a produced status event reports the user online.
    #[serde(default = "default_online_probability")]
    pub online_probability: f64,
    /// User ids the simulator picks from.
    #[serde(default = "default_roster")]
    pub roster: Vec<String>,
    /// Fixed RNG seed; `None` seeds from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl PresenceConfig {
    /// Connect delay as a [`Duration`].
    pub fn connect_delay(&self) -> Duration {
        Duration::from_millis(self.connect_delay_ms)
    }

    /// Tick interval as a [`Duration`].
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Reject settings the simulator cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.tick_interval_ms == 0 {
            return Err(AppError::configuration(
                "presence.tick_interval_ms must be greater than zero",
            ));
        }
        for (name, value) in [
            ("select_probability", self.select_probability),
            ("online_probability", self.online_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AppError::configuration(format!(
                    "presence.{name} must be between 0 and 1, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            transport: default_transport(),
            url: default_url(),
            connect_delay_ms: default_connect_delay(),
            tick_interval_ms: default_tick_interval(),
            select_probability: default_select_probability(),
            online_probability: default_online_probability(),
            roster: default_roster(),
            seed: None,
        }
    }
}

fn default_transport() -> TransportKind {
    TransportKind::Simulated
}

fn default_url() -> String {
    "ws://127.0.0.1:8000/ws".to_string()
}

fn default_connect_delay() -> u64 {
    500
}

fn default_tick_interval() -> u64 {
    10_000
}

fn default_select_probability() -> f64 {
    0.3
}

fn default_online_probability() -> f64 {
    0.7
}

fn default_roster() -> Vec<String> {
    ["1", "2", "3", "4", "5"].iter().map(|s| s.to_string()).collect()
}
