//! User storage implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, RecordId};

use super::base::SharedStorage;
use super::record_key;
use crate::models::{NewUser, User, new_user_id};
use crate::storage::errors::StorageError;
use crate::storage::traits::UserStore;

/// Internal representation of a User record for SurrealDB
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct SurrealUser {
    id: RecordId,
    username: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Struct for creating users (timestamps handled by SurrealDB)
#[derive(Debug, Clone, serde::Serialize)]
struct CreateUser {
    username: String,
    email: String,
    password_hash: String,
}

impl From<SurrealUser> for User {
    fn from(surreal_user: SurrealUser) -> Self {
        Self {
            id: record_key(&surreal_user.id),
            username: surreal_user.username,
            email: surreal_user.email,
            password_hash: surreal_user.password_hash,
            created_at: surreal_user.created_at,
            updated_at: surreal_user.updated_at,
        }
    }
}

impl<C> SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn find_user_by_field(
        &self,
        field: &'static str,
        value: &str,
    ) -> Result<Option<User>, StorageError> {
        let query = format!("SELECT * FROM user WHERE {} = $value LIMIT 1", field);
        let mut response = self
            .client
            .query(query)
            .bind(("value", value.to_string()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to find user by {}: {}", field, e)))?;

        let users: Vec<SurrealUser> = response.take(0).map_err(|e| {
            StorageError::Query(format!("Failed to extract user by {}: {}", field, e))
        })?;

        Ok(users.into_iter().next().map(User::from))
    }
}

#[async_trait]
impl<C> UserStore for SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn create_user(&self, user: NewUser) -> Result<User, StorageError> {
        if self.find_user_by_username(&user.username).await?.is_some() {
            return Err(StorageError::AlreadyExists(format!(
                "Username '{}' is already taken",
                user.username
            )));
        }
        if self.find_user_by_email(&user.email).await?.is_some() {
            return Err(StorageError::AlreadyExists(format!(
                "Email '{}' is already registered",
                user.email
            )));
        }

        let username = user.username.clone();
        let create_user = CreateUser {
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
        };

        let created: Option<SurrealUser> = self
            .client
            .create(("user", new_user_id()))
            .content(create_user)
            .await
            .map_err(|e| {
                // The unique indexes catch a concurrent registration that
                // slipped past the checks above.
                let message = e.to_string();
                if message.contains("already contains") {
                    StorageError::AlreadyExists(format!(
                        "Username or email for '{}' is already registered",
                        username
                    ))
                } else {
                    StorageError::Query(format!("Failed to create user: {}", message))
                }
            })?;

        created
            .map(User::from)
            .ok_or_else(|| StorageError::Internal("No user created".to_string()))
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, StorageError> {
        let user: Option<SurrealUser> = self
            .client
            .select(("user", id))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to get user: {}", e)))?;

        Ok(user.map(User::from))
    }

    async fn get_users(&self, ids: &[String]) -> Result<Vec<User>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let record_ids: Vec<RecordId> = ids
            .iter()
            .map(|id| RecordId::from(("user", id.as_str())))
            .collect();

        let mut response = self
            .client
            .query("SELECT * FROM user WHERE id IN $ids")
            .bind(("ids", record_ids))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to get users: {}", e)))?;

        let users: Vec<SurrealUser> = response
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract users: {}", e)))?;

        Ok(users.into_iter().map(User::from).collect())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        self.find_user_by_field("username", username).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        self.find_user_by_field("email", email).await
    }

    async fn list_users(&self, exclude: Option<&str>) -> Result<Vec<User>, StorageError> {
        let mut response = match exclude {
            Some(id) => self
                .client
                .query("SELECT * FROM user WHERE id != $exclude ORDER BY username ASC")
                .bind(("exclude", RecordId::from(("user", id)))),
            None => self.client.query("SELECT * FROM user ORDER BY username ASC"),
        }
        .await
        .map_err(|e| StorageError::Query(format!("Failed to list users: {}", e)))?;

        let users: Vec<SurrealUser> = response
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract users: {}", e)))?;

        Ok(users.into_iter().map(User::from).collect())
    }
}
