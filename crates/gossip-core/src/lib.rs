//! # gossip-core
//!
//! Core crate for the GossipGo client. Contains the unified error system,
//! configuration schemas, typed identifiers, the response envelope shared
//! by every remote call, and the local storage trait.
//!
//! This crate has **no** internal dependencies on other GossipGo crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
