//! # gossip-storage
//!
//! Implementations of [`KeyValueStore`] used for the session snapshot and
//! other client state that must survive a restart.
//!
//! - [`FileStore`]: one JSON document per key under a data directory.
//! - [`MemoryStore`]: process memory, for tests and ephemeral runs.

#[cfg(feature = "file")]
pub mod file;
#[cfg(feature = "memory")]
pub mod memory;

use std::sync::Arc;

use gossip_core::config::session::{SessionConfig, StorageBackend};
use gossip_core::error::AppError;
use gossip_core::result::AppResult;
use gossip_core::traits::KeyValueStore;
use tracing::info;

#[cfg(feature = "file")]
pub use file::FileStore;
#[cfg(feature = "memory")]
pub use memory::MemoryStore;

/// Build the store selected by the session configuration.
pub async fn build_store(config: &SessionConfig) -> AppResult<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config.storage {
        #[cfg(feature = "file")]
        StorageBackend::File => Arc::new(FileStore::new(&config.data_dir).await?),
        #[cfg(feature = "memory")]
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        #[allow(unreachable_patterns)]
        other => {
            return Err(AppError::configuration(format!(
                "Storage backend {other:?} is not compiled in"
            )));
        }
    };
    info!(backend = store.backend_name(), "Local store ready");
    Ok(store)
}
