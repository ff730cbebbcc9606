//! Connection (contact request) entities.

pub mod model;
pub mod status;

pub use model::Connection;
pub use status::{ConnectionState, ConnectionStatus};
