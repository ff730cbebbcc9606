//! Connection graph: pairwise contact requests and their status.
//!
//! [`ConnectionGraph`] is the plain record set. [`ConnectionBook`] binds it
//! to the signed-in user and is safe to share across tasks.
//! [`SyncedConnectionBook`] mirrors every change to the backend and undoes
//! it locally when the backend refuses.

pub mod book;
pub mod graph;
pub mod synced;

pub use book::ConnectionBook;
pub use graph::{Change, ConnectionGraph};
pub use synced::SyncedConnectionBook;
