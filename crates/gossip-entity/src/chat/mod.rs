//! Chat list entities.

pub mod model;

pub use model::ChatSummary;
