//! SurrealDB-backed storage for users, goals and friendships.
//!
//! One [`SharedStorage`] value implements every store trait against a single
//! database. The same code runs on the in-memory engine (tests, ephemeral
//! deployments) and on embedded RocksDB.

use surrealdb::{RecordId, Surreal};

use crate::storage::errors::StorageError;

pub mod base;
pub mod config;
pub mod friendship;
pub mod goal;
pub mod schema;
pub mod user;

pub use base::*;
pub use config::*;

/// Type alias for embedded shared storage
pub type EmbeddedSharedStorage = SharedStorage<surrealdb::engine::local::Db>;

/// Create an embedded shared storage instance
#[cfg(feature = "surrealdb-rocksdb")]
pub async fn create_embedded_shared_storage(
    path: &str,
    config: SharedStorageConfig,
) -> Result<EmbeddedSharedStorage, StorageError> {
    use surrealdb::engine::local::RocksDb;

    let client = Surreal::new::<RocksDb>(path).await.map_err(|e| {
        StorageError::Connection(format!("Failed to create embedded database: {}", e))
    })?;

    SharedStorage::new(client, config).await
}

/// Create an in-memory shared storage instance
pub async fn create_memory_shared_storage(
    config: SharedStorageConfig,
) -> Result<EmbeddedSharedStorage, StorageError> {
    let client = Surreal::new::<surrealdb::engine::local::Mem>(())
        .await
        .map_err(|e| StorageError::Connection(format!("Failed to create memory client: {}", e)))?;

    SharedStorage::new(client, config).await
}

/// Plain key of a record id.
///
/// `RecordId::key().to_string()` wraps keys that are not simple identifiers
/// (for example keys starting with a digit) in `⟨⟩`; strip them.
pub(crate) fn record_key(id: &RecordId) -> String {
    let key_string = id.key().to_string();
    key_string
        .strip_prefix('⟨')
        .and_then(|s| s.strip_suffix('⟩'))
        .unwrap_or(&key_string)
        .to_string()
}
