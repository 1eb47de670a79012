use crate::config::{
    ConfigBuilder, ConfigLoader, GoalpostConfig, LogLevel, validation,
};
use crate::storage::config::SurrealDBEngine;
use std::path::PathBuf;

#[test]
fn test_default_config() {
    let config = GoalpostConfig::default();
    assert_eq!(config.storage.surrealdb.engine, SurrealDBEngine::RocksDB);
    assert_eq!(config.storage.surrealdb.namespace, "goalpost");
    assert_eq!(config.logging.level, LogLevel::Info);
    assert!(validation::validate_config(&config).is_ok());
}

#[test]
fn test_builder_memory_storage() {
    let config = ConfigBuilder::new()
        .with_data_dir("/tmp/goalpost_test")
        .with_memory_storage()
        .with_log_level(LogLevel::Debug)
        .build()
        .unwrap();

    assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/goalpost_test"));
    assert_eq!(config.storage.surrealdb.engine, SurrealDBEngine::Memory);
    assert_eq!(config.logging.level, LogLevel::Debug);
}

#[test]
fn test_database_path_defaults_under_data_dir() {
    let config = ConfigBuilder::new()
        .with_data_dir("/var/lib/goalpost")
        .with_disk_storage()
        .build()
        .unwrap();

    assert_eq!(
        config.storage.database_path(),
        PathBuf::from("/var/lib/goalpost/db")
    );
}

#[test]
fn test_empty_namespace_is_rejected() {
    let result = ConfigBuilder::new().with_database("", "main").build();
    assert!(result.is_err());
}

#[test]
fn test_presets() {
    let dev = ConfigBuilder::development().build().unwrap();
    let test = ConfigBuilder::testing().build().unwrap();

    assert_eq!(dev.logging.level, LogLevel::Debug);
    assert_eq!(test.storage.surrealdb.engine, SurrealDBEngine::Memory);
    assert_eq!(test.storage.data_dir, PathBuf::from("./test_data"));
}

#[test]
fn test_loader_reads_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("goalpost.toml");
    std::fs::write(
        &path,
        r#"
[storage.surrealdb]
engine = "Memory"
namespace = "from_file"

[logging]
level = "warn"
"#,
    )
    .unwrap();

    let mut loader = ConfigLoader::new();
    loader.load_file(&path).unwrap();
    let config = loader.extract().unwrap();

    assert_eq!(config.storage.surrealdb.engine, SurrealDBEngine::Memory);
    assert_eq!(config.storage.surrealdb.namespace, "from_file");
    assert_eq!(config.storage.surrealdb.database, "main");
    assert_eq!(config.logging.level, LogLevel::Warn);
}

#[test]
fn test_loader_rejects_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("goalpost.ini");
    std::fs::write(&path, "level=info").unwrap();

    let mut loader = ConfigLoader::new();
    assert!(loader.load_file(&path).is_err());
}

#[test]
fn test_config_serialization() {
    let config = ConfigBuilder::testing().build().unwrap();

    let json = serde_json::to_string(&config).unwrap();
    let deserialized: GoalpostConfig = serde_json::from_str(&json).unwrap();

    assert_eq!(config.storage.data_dir, deserialized.storage.data_dir);
    assert_eq!(
        config.storage.surrealdb.engine,
        deserialized.storage.surrealdb.engine
    );
}
