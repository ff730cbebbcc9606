//! Cross-crate integration tests for the GossipGo client.

mod connection_test;
mod directory_test;
mod helpers;
mod presence_test;
mod session_test;
