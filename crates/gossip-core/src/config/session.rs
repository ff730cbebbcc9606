//! Session persistence and authentication configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where session snapshots and other local state are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per key under `data_dir`.
    File,
    /// Process memory only; nothing survives a restart.
    Memory,
}

/// Which authentication gateway the session store talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayKind {
    /// The REST backend at `api.base_url`.
    Http,
    /// In-memory demo accounts.
    Mock,
}

/// Session store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Storage backend for the session snapshot.
    #[serde(default = "default_storage")]
    pub storage: StorageBackend,
    /// Directory used by the file backend.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Key the session snapshot is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Key the local connection graph is stored under.
    #[serde(default = "default_connections_key")]
    pub connections_key: String,
    /// Authentication gateway.
    #[serde(default = "default_gateway")]
    pub gateway: GatewayKind,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage: default_storage(),
            data_dir: default_data_dir(),
            storage_key: default_storage_key(),
            connections_key: default_connections_key(),
            gateway: default_gateway(),
        }
    }
}

fn default_storage() -> StorageBackend {
    StorageBackend::File
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_storage_key() -> String {
    "chatUser".to_string()
}

fn default_connections_key() -> String {
    "connections".to_string()
}

fn default_gateway() -> GatewayKind {
    GatewayKind::Mock
}
