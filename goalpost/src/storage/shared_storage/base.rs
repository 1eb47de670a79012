//! Base shared storage implementation

use async_trait::async_trait;
use surrealdb::{Connection, Surreal};

use super::config::SharedStorageConfig;
use crate::storage::errors::StorageError;
use crate::storage::traits::BaseStore;

/// Main shared storage manager
#[derive(Debug, Clone)]
pub struct SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    pub(crate) client: Surreal<C>,
    pub(crate) config: SharedStorageConfig,
}

impl<C> SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    /// Create a new shared storage instance
    pub async fn new(
        client: Surreal<C>,
        config: SharedStorageConfig,
    ) -> Result<Self, StorageError> {
        client
            .use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .map_err(|e| {
                StorageError::Connection(format!("Failed to set namespace/database: {}", e))
            })?;

        let storage = Self { client, config };

        storage.initialize_schema().await?;

        tracing::debug!(
            namespace = %storage.config.namespace,
            database = %storage.config.database,
            "SharedStorage ready"
        );

        Ok(storage)
    }

    /// Initialize the database schema
    async fn initialize_schema(&self) -> Result<(), StorageError> {
        super::schema::initialize_schema(&self.client).await
    }

    /// Get the underlying SurrealDB client
    pub fn client(&self) -> &Surreal<C> {
        &self.client
    }

    /// Get the storage configuration
    pub fn config(&self) -> &SharedStorageConfig {
        &self.config
    }
}

const TABLES: [&str; 3] = ["user", "goal", "friendship"];

#[async_trait]
impl<C> BaseStore for SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn health_check(&self) -> Result<bool, StorageError> {
        self.client
            .query("INFO FOR DB")
            .await
            .and_then(|response| response.check())
            .map_err(|e| StorageError::Connection(format!("Health check failed: {}", e)))?;

        Ok(true)
    }

    async fn clear(&self) -> Result<(), StorageError> {
        // Friendships and goals reference users by id, so they go first.
        self.client
            .query("DELETE friendship; DELETE goal; DELETE user;")
            .await
            .and_then(|response| response.check())
            .map_err(|e| StorageError::Query(format!("Failed to clear tables: {}", e)))?;

        tracing::debug!("Cleared all tables");
        Ok(())
    }

    async fn get_metadata(&self) -> Result<serde_json::Value, StorageError> {
        let mut counts = serde_json::Map::new();
        for table in TABLES {
            let mut response = self
                .client
                .query(format!("SELECT count() AS total FROM {} GROUP ALL", table))
                .await
                .map_err(|e| StorageError::Query(format!("Failed to count {}: {}", table, e)))?;
            let total: Option<i64> = response
                .take("total")
                .map_err(|e| StorageError::Query(format!("Failed to count {}: {}", table, e)))?;
            counts.insert(table.to_string(), serde_json::json!(total.unwrap_or(0)));
        }

        Ok(serde_json::json!({
            "type": "shared_storage",
            "namespace": self.config.namespace,
            "database": self.config.database,
            "records": counts,
        }))
    }

    async fn close(&self) -> Result<(), StorageError> {
        // Dropping the last client handle closes the engine.
        Ok(())
    }
}
