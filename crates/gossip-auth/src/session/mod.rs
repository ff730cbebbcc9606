//! Session lifecycle: login, signup, logout, and restore on start-up.

pub mod store;

pub use store::SessionStore;
