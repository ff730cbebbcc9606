//! Presence state derived from channel events.

pub mod roster;

pub use roster::PresenceRoster;
