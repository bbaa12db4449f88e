//! Key-value storage port (outbound).
//!
//! The local fallback backend keeps every collection as one JSON document
//! under a namespaced key. Implementations live in `adapters::outbound::local`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Namespaced get/set/remove over JSON values.
pub trait KeyValueStore: Send + Sync + 'static {
    /// Returns `Ok(None)` when nothing is stored under `key`.
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError>;

    fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// A fresh opaque identifier for a new record.
    fn generate_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}
