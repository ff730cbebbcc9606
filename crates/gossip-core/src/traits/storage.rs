//! Durable key/value storage for client-side state.

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for local key/value backends (files on disk, process memory).
///
/// Values are opaque strings, usually JSON documents. Keys are short
/// identifiers such as `"chatUser"`; backends may reject keys that cannot
/// be mapped onto their storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Store a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Remove a key. Returns `true` if something was removed.
    async fn remove(&self, key: &str) -> AppResult<bool>;

    /// Check whether a key exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Short backend name for logs.
    fn backend_name(&self) -> &str;
}
