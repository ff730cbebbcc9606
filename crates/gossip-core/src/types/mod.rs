//! Core type definitions used across the GossipGo workspace.

pub mod id;
pub mod response;

pub use id::*;
pub use response::{ApiEnvelope, decode_item, decode_list};
