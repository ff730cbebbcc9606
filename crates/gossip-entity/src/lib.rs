//! # gossip-entity
//!
//! Domain entity models for the GossipGo client. Every struct here is a
//! value object exchanged with the backend or kept in local state. All
//! entities derive `Debug`, `Clone`, `Serialize` and `Deserialize`, and use
//! the camelCase field names the backend speaks.

pub mod chat;
pub mod connection;
pub mod message;
pub mod session;
pub mod user;
