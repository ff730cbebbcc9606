//! # gossip-auth
//!
//! Client-side authentication for GossipGo.
//!
//! ## Modules
//!
//! - `gateway`: the [`AuthGateway`] seam and an in-memory demo gateway
//! - `session`: the [`SessionStore`] holding the signed-in identity and
//!   persisting it across restarts

pub mod gateway;
pub mod session;

pub use gateway::{AuthGateway, MockAuthGateway};
pub use session::SessionStore;
