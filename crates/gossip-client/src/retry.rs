//! Retry policy for transient backend failures.

use std::time::Duration;

use rand::Rng;

use gossip_core::config::api::ApiConfig;

use crate::error::kind_for_status;

/// Longest server-requested wait honoured from a `Retry-After` header.
const MAX_RETRY_AFTER_SECS: u64 = 60;

/// Floor for any computed delay.
const MIN_DELAY_MS: u64 = 100;

/// Exponential backoff with ±25% jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
    /// Cap on a single computed delay.
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// Policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (0-based), without jitter.
    ///
    /// A `Retry-After` value from the server is honoured up to one
    /// minute, but never shortens the computed backoff.
    pub fn base_delay(&self, attempt: u32, retry_after_secs: Option<u64>) -> Duration {
        let initial = self.initial_backoff.as_millis() as u64;
        let cap = self.max_backoff.as_millis() as u64;
        let backoff = initial
            .saturating_mul(2u64.saturating_pow(attempt))
            .min(cap);
        let millis = match retry_after_secs {
            Some(secs) => (secs.min(MAX_RETRY_AFTER_SECS) * 1_000).max(backoff),
            None => backoff,
        };
        Duration::from_millis(millis)
    }

    /// [`base_delay`](Self::base_delay) with ±25% jitter applied.
    pub fn delay(&self, attempt: u32, retry_after_secs: Option<u64>) -> Duration {
        let base = self.base_delay(attempt, retry_after_secs).as_millis() as i64;
        let spread = base / 4;
        let offset = if spread == 0 {
            0
        } else {
            rand::rng().random_range(-spread..=spread)
        };
        Duration::from_millis((base + offset).max(MIN_DELAY_MS as i64) as u64)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&ApiConfig::default())
    }
}

impl From<&ApiConfig> for RetryPolicy {
    fn from(config: &ApiConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
        }
    }
}

/// Whether an HTTP status is worth retrying.
pub fn is_retryable_status(status: u16) -> bool {
    kind_for_status(status).is_transient()
}

/// Parse a `Retry-After` header given in whole seconds. HTTP dates are
/// not supported and fall back to the computed backoff.
pub fn parse_retry_after(value: &str) -> Option<u64> {
    value.trim().parse().ok()
}
