//! Storage abstractions and implementations
//!
//! The managers only see the [`traits::AppStore`] trait object. The one
//! implementation, [`shared_storage::SharedStorage`], keeps users, goals and
//! friendships in a single SurrealDB database, either in memory or embedded
//! on disk with RocksDB.

pub mod config;
pub mod errors;
pub mod shared_storage;
pub mod traits;

pub use errors::{StorageError, StorageResult};

use crate::storage::config::SurrealDBEngine;
use crate::storage::shared_storage::SharedStorageConfig;
use crate::storage::traits::AppStore;

/// Create the storage service described by the configuration.
///
/// Connects to the configured engine, selects namespace and database and
/// initialises the schema.
pub async fn create_storage_service(
    config: &crate::config::GoalpostConfig,
) -> Result<Box<dyn AppStore>, StorageError> {
    let shared_config = SharedStorageConfig::from(&config.storage.surrealdb);

    match config.storage.surrealdb.engine {
        SurrealDBEngine::Memory => {
            tracing::info!("Creating SharedStorage with in-memory engine");
            let shared_storage = shared_storage::create_memory_shared_storage(shared_config).await?;
            Ok(Box::new(shared_storage))
        }
        #[cfg(feature = "surrealdb-rocksdb")]
        SurrealDBEngine::RocksDB => {
            let path = config.storage.database_path();
            tracing::info!("Creating SharedStorage with RocksDB engine at {}", path.display());
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StorageError::Configuration(format!(
                        "Storage directory {} not accessible: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
            let shared_storage =
                shared_storage::create_embedded_shared_storage(&path.to_string_lossy(), shared_config)
                    .await?;
            Ok(Box::new(shared_storage))
        }
        #[cfg(not(feature = "surrealdb-rocksdb"))]
        SurrealDBEngine::RocksDB => Err(StorageError::Configuration(
            "RocksDB engine requires the 'surrealdb-rocksdb' feature to be enabled".to_string(),
        )),
    }
}
