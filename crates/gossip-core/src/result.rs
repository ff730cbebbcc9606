//! Convenience result alias.

use crate::error::AppError;

/// Result type used across every GossipGo crate.
pub type AppResult<T> = Result<T, AppError>;
