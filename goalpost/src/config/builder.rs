//! Configuration builder.

use super::{Result, models::*, validation};
use crate::storage::config::SurrealDBEngine;
use std::path::Path;

/// Builder for creating GoalpostConfig instances.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: GoalpostConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self {
            config: GoalpostConfig::default(),
        }
    }

    /// Start from an already loaded configuration.
    pub fn from_config(config: GoalpostConfig) -> Self {
        Self { config }
    }

    /// Set the base data directory.
    pub fn with_data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.storage.data_dir = path.as_ref().to_path_buf();
        self
    }

    /// Use the embedded RocksDB engine under the data directory
    pub fn with_disk_storage(mut self) -> Self {
        self.config.storage.surrealdb.engine = SurrealDBEngine::RocksDB;
        self.config.storage.surrealdb.connection = String::new();
        self
    }

    /// Use in-memory storage (good for testing)
    pub fn with_memory_storage(mut self) -> Self {
        self.config.storage.surrealdb.engine = SurrealDBEngine::Memory;
        self
    }

    /// Set the SurrealDB namespace and database.
    pub fn with_database(mut self, namespace: impl Into<String>, database: impl Into<String>) -> Self {
        self.config.storage.surrealdb.namespace = namespace.into();
        self.config.storage.surrealdb.database = database.into();
        self
    }

    /// Set the log level.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Set the log format.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.config.logging.format = format;
        self
    }

    /// Configure logging to a file.
    pub fn with_log_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.logging.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Development preset: on-disk storage, debug logging.
    pub fn development() -> Self {
        Self::new()
            .with_disk_storage()
            .with_log_level(LogLevel::Debug)
            .with_log_format(LogFormat::Pretty)
    }

    /// Testing preset: in-memory storage, warnings only.
    pub fn testing() -> Self {
        Self::new()
            .with_data_dir("./test_data")
            .with_memory_storage()
            .with_log_level(LogLevel::Warn)
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<GoalpostConfig> {
        validation::validate_config(&self.config)?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
