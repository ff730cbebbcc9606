//! Human-friendly timestamps for chat rows.

use chrono::{DateTime, Utc};

/// Label for a chat row: `HH:MM` within the last day, `Yesterday` one
/// whole day back, `N days ago` beyond that.
pub fn relative_time_label(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    match (now - timestamp).num_days() {
        1 => "Yesterday".to_string(),
        days if days > 1 => format!("{days} days ago"),
        _ => timestamp.format("%H:%M").to_string(),
    }
}
