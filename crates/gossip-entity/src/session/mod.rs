//! Session domain entities.

pub mod model;

pub use model::{Credentials, Session, SignupRequest};
