//! Schema initialization for SharedStorage

use crate::storage::errors::StorageError;
use surrealdb::{Connection, Surreal};

/// Define the user, goal and friendship tables.
///
/// Every statement is `IF NOT EXISTS`, so this runs on every start.
pub async fn initialize_schema<C>(client: &Surreal<C>) -> Result<(), StorageError>
where
    C: Connection,
{
    let user_table_query = r#"
        DEFINE TABLE IF NOT EXISTS user SCHEMAFULL
        COMMENT "Registered accounts";

        DEFINE FIELD IF NOT EXISTS username ON user TYPE string ASSERT string::len($value) > 0;
        DEFINE FIELD IF NOT EXISTS email ON user TYPE string ASSERT string::len($value) > 0;
        DEFINE FIELD IF NOT EXISTS password_hash ON user TYPE string;
        DEFINE FIELD IF NOT EXISTS created_at ON user TYPE datetime DEFAULT time::now();
        DEFINE FIELD IF NOT EXISTS updated_at ON user TYPE datetime VALUE time::now();

        DEFINE INDEX IF NOT EXISTS user_username_idx ON user FIELDS username UNIQUE;
        DEFINE INDEX IF NOT EXISTS user_email_idx ON user FIELDS email UNIQUE;
    "#;

    // Deadlines are kept as RFC 3339 strings; created_at drives ordering.
    let goal_table_query = r#"
        DEFINE TABLE IF NOT EXISTS goal SCHEMAFULL
        COMMENT "Goals owned by one user and shared with friends";

        DEFINE FIELD IF NOT EXISTS title ON goal TYPE string;
        DEFINE FIELD IF NOT EXISTS description ON goal TYPE string;
        DEFINE FIELD IF NOT EXISTS deadline ON goal TYPE string;
        DEFINE FIELD IF NOT EXISTS owner ON goal TYPE string;
        DEFINE FIELD IF NOT EXISTS shared_with ON goal TYPE array<string> DEFAULT [];
        DEFINE FIELD IF NOT EXISTS created_at ON goal TYPE datetime DEFAULT time::now();
        DEFINE FIELD IF NOT EXISTS updated_at ON goal TYPE datetime VALUE time::now();

        DEFINE INDEX IF NOT EXISTS goal_owner_idx ON goal FIELDS owner;
        DEFINE INDEX IF NOT EXISTS goal_shared_idx ON goal FIELDS shared_with;
    "#;

    // The first record of a pair is keyed by the sorted pair, so the record
    // id itself rejects a second request between the same two users.
    let friendship_table_query = r#"
        DEFINE TABLE IF NOT EXISTS friendship SCHEMAFULL
        COMMENT "Directed friendship records";

        DEFINE FIELD IF NOT EXISTS requester ON friendship TYPE string;
        DEFINE FIELD IF NOT EXISTS recipient ON friendship TYPE string;
        DEFINE FIELD IF NOT EXISTS status ON friendship TYPE string
            ASSERT $value IN ["pending", "accepted", "blocked"];
        DEFINE FIELD IF NOT EXISTS created_at ON friendship TYPE datetime DEFAULT time::now();
        DEFINE FIELD IF NOT EXISTS updated_at ON friendship TYPE datetime VALUE time::now();

        DEFINE INDEX IF NOT EXISTS friendship_requester_idx ON friendship FIELDS requester;
        DEFINE INDEX IF NOT EXISTS friendship_recipient_idx ON friendship FIELDS recipient;
        DEFINE INDEX IF NOT EXISTS friendship_status_idx ON friendship FIELDS status;
        DEFINE INDEX IF NOT EXISTS friendship_direction_idx ON friendship FIELDS requester, recipient UNIQUE;
    "#;

    for (name, query) in [
        ("user", user_table_query),
        ("goal", goal_table_query),
        ("friendship", friendship_table_query),
    ] {
        client
            .query(query)
            .await
            .map_err(|e| StorageError::Query(format!("Failed to define {} table: {}", name, e)))?
            .check()
            .map_err(|e| StorageError::Query(format!("Failed to define {} table: {}", name, e)))?;
    }

    tracing::debug!("Schema initialized");
    Ok(())
}
