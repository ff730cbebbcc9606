//! Core traits defined in `gossip-core` and implemented by other crates.

pub mod storage;

pub use storage::KeyValueStore;
