//! Configuration structures for the storage backend

use serde::{Deserialize, Serialize};

/// SurrealDB configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurrealDBConfig {
    /// SurrealDB engine type
    pub engine: SurrealDBEngine,

    /// Path for the embedded engine; empty means `<data_dir>/db`
    pub connection: String,

    /// Namespace
    pub namespace: String,

    /// Database name
    pub database: String,
}

impl Default for SurrealDBConfig {
    fn default() -> Self {
        Self {
            engine: SurrealDBEngine::RocksDB,
            connection: String::new(),
            namespace: "goalpost".to_string(),
            database: "main".to_string(),
        }
    }
}

/// SurrealDB engine types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SurrealDBEngine {
    /// In-memory storage (for testing)
    Memory,
    /// RocksDB on-disk storage (embedded)
    RocksDB,
}
