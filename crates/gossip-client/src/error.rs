//! Mapping of HTTP failures onto [`AppError`].

use serde_json::Value;

use gossip_core::error::{AppError, ErrorKind};

/// Error kind for a non-success HTTP status.
///
/// Only 429 and 500/502/503/504 map to transient kinds; every retry
/// decision goes through this table.
pub fn kind_for_status(status: u16) -> ErrorKind {
    match status {
        400 | 422 => ErrorKind::Validation,
        401 => ErrorKind::Authentication,
        403 => ErrorKind::Authorization,
        404 => ErrorKind::NotFound,
        409 => ErrorKind::Conflict,
        429 => ErrorKind::RateLimit,
        500 | 502 | 503 | 504 => ErrorKind::ServiceUnavailable,
        501 => ErrorKind::NotImplemented,
        _ => ErrorKind::ExternalService,
    }
}

/// Human-readable message from an error body: `message`, then `detail`,
/// then the raw text.
pub fn message_from_body(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return Some(body.to_string());
    };
    ["message", "detail", "error"]
        .iter()
        .filter_map(|key| json.get(*key))
        .find_map(|value| match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Null | Value::String(_) => None,
            other => Some(other.to_string()),
        })
}

/// Build the error for a failed response.
pub fn status_error(status: u16, body: &str) -> AppError {
    let message = message_from_body(body)
        .unwrap_or_else(|| format!("Request failed with status {status}"));
    AppError::new(kind_for_status(status), message)
}

/// Build the error for a request that never produced a response.
pub fn transport_error(url: &str, error: reqwest::Error) -> AppError {
    let message = if error.is_timeout() {
        format!("Request to {url} timed out")
    } else {
        format!("Request to {url} failed")
    };
    AppError::with_source(ErrorKind::ServiceUnavailable, message, error)
}
