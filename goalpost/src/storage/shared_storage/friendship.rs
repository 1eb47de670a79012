//! Friendship storage implementation
//!
//! The first record between two users is stored under the sorted pair key
//! (see [`pair_key`]), the mirror written on acceptance under
//! [`mirror_key`]. Lookups never assume a direction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, RecordId};

use super::base::SharedStorage;
use super::record_key;
use crate::models::{Friendship, FriendshipStatus, mirror_key, pair_key};
use crate::storage::errors::StorageError;
use crate::storage::traits::{FriendshipStore, FriendshipUpdate};

/// Internal representation of a Friendship record for SurrealDB
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct SurrealFriendship {
    id: RecordId,
    requester: String,
    recipient: String,
    status: FriendshipStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Struct for creating friendships (timestamps handled by SurrealDB)
#[derive(Debug, Clone, serde::Serialize)]
struct CreateFriendship {
    requester: String,
    recipient: String,
    status: FriendshipStatus,
}

impl From<SurrealFriendship> for Friendship {
    fn from(surreal_friendship: SurrealFriendship) -> Self {
        Self {
            id: record_key(&surreal_friendship.id),
            requester: surreal_friendship.requester,
            recipient: surreal_friendship.recipient,
            status: surreal_friendship.status,
            created_at: surreal_friendship.created_at,
            updated_at: surreal_friendship.updated_at,
        }
    }
}

const BETWEEN: &str =
    "((requester = $a AND recipient = $b) OR (requester = $b AND recipient = $a))";

const ACCEPT_QUERY: &str = r#"
    BEGIN TRANSACTION;
    LET $updated = (UPDATE $request SET status = "accepted" WHERE status = "pending" RETURN AFTER);
    IF array::len($updated) = 0 {
        THROW "friend request is no longer pending";
    };
    CREATE $mirror CONTENT {
        requester: $recipient,
        recipient: $requester,
        status: "accepted"
    };
    COMMIT TRANSACTION;
"#;

fn friendship_id(id: &str) -> RecordId {
    RecordId::from(("friendship", id))
}

#[async_trait]
impl<C> FriendshipStore for SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn create_friendship(
        &self,
        requester: &str,
        recipient: &str,
        status: FriendshipStatus,
    ) -> Result<Friendship, StorageError> {
        let key = pair_key(requester, recipient);
        let create_friendship = CreateFriendship {
            requester: requester.to_string(),
            recipient: recipient.to_string(),
            status,
        };

        let created: Result<Option<SurrealFriendship>, _> = self
            .client
            .create(("friendship", key.as_str()))
            .content(create_friendship)
            .await;

        match created {
            Ok(Some(record)) => Ok(Friendship::from(record)),
            Ok(None) => Err(StorageError::Internal(
                "No friendship record created".to_string(),
            )),
            Err(e) => {
                // Losing a race against another request for the same pair
                // surfaces as a record-id collision.
                if self.find_friendship_between(requester, recipient).await?.is_some() {
                    Err(StorageError::AlreadyExists(format!(
                        "A friendship record between '{}' and '{}' already exists",
                        requester, recipient
                    )))
                } else {
                    Err(StorageError::Query(format!(
                        "Failed to create friendship: {}",
                        e
                    )))
                }
            }
        }
    }

    async fn get_friendship(&self, id: &str) -> Result<Option<Friendship>, StorageError> {
        let friendship: Option<SurrealFriendship> = self
            .client
            .select(("friendship", id))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to get friendship: {}", e)))?;

        Ok(friendship.map(Friendship::from))
    }

    async fn find_friendship_between(
        &self,
        a: &str,
        b: &str,
    ) -> Result<Option<Friendship>, StorageError> {
        let query = format!(
            "SELECT * FROM friendship WHERE {} ORDER BY created_at ASC LIMIT 1",
            BETWEEN
        );
        let mut response = self
            .client
            .query(query)
            .bind(("a", a.to_string()))
            .bind(("b", b.to_string()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to find friendship: {}", e)))?;

        let records: Vec<SurrealFriendship> = response
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract friendship: {}", e)))?;

        Ok(records.into_iter().next().map(Friendship::from))
    }

    async fn update_friendship(
        &self,
        id: &str,
        update: FriendshipUpdate,
    ) -> Result<Friendship, StorageError> {
        let Some(status) = update.status else {
            return self
                .get_friendship(id)
                .await?
                .ok_or_else(|| StorageError::NotFound(format!("Friendship '{}' not found", id)));
        };

        let mut response = self
            .client
            .query("UPDATE $record SET status = $status RETURN AFTER")
            .bind(("record", friendship_id(id)))
            .bind(("status", status))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to update friendship: {}", e)))?;

        let updated: Vec<SurrealFriendship> = response
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract friendship: {}", e)))?;

        updated
            .into_iter()
            .next()
            .map(Friendship::from)
            .ok_or_else(|| StorageError::NotFound(format!("Friendship '{}' not found", id)))
    }

    async fn accept_friendship(&self, id: &str) -> Result<(Friendship, Friendship), StorageError> {
        let request = self
            .get_friendship(id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("Friendship '{}' not found", id)))?;

        let mirror = mirror_key(&request.pair_key());

        let response = self
            .client
            .query(ACCEPT_QUERY)
            .bind(("request", friendship_id(id)))
            .bind(("mirror", friendship_id(&mirror)))
            .bind(("requester", request.requester.clone()))
            .bind(("recipient", request.recipient.clone()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to accept friendship: {}", e)))?;

        response.check().map_err(|e| {
            tracing::debug!(friendship_id = %id, error = %e, "Accept transaction rolled back");
            StorageError::Transaction(format!("Failed to accept friendship '{}': {}", id, e))
        })?;

        let accepted = self.get_friendship(id).await?;
        let mirrored = self.get_friendship(&mirror).await?;

        match (accepted, mirrored) {
            (Some(accepted), Some(mirrored)) => Ok((accepted, mirrored)),
            _ => Err(StorageError::Internal(format!(
                "Friendship '{}' accepted but records could not be read back",
                id
            ))),
        }
    }

    async fn delete_friendship(
        &self,
        id: &str,
        required_status: FriendshipStatus,
    ) -> Result<bool, StorageError> {
        let mut response = self
            .client
            .query("DELETE $record WHERE status = $status RETURN BEFORE")
            .bind(("record", friendship_id(id)))
            .bind(("status", required_status))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to delete friendship: {}", e)))?;

        let deleted: Vec<SurrealFriendship> = response
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract friendship: {}", e)))?;

        Ok(!deleted.is_empty())
    }

    async fn delete_friendships_between(
        &self,
        a: &str,
        b: &str,
        required_status: FriendshipStatus,
    ) -> Result<bool, StorageError> {
        let query = format!(
            "DELETE friendship WHERE {} AND status = $status RETURN BEFORE",
            BETWEEN
        );
        let mut response = self
            .client
            .query(query)
            .bind(("a", a.to_string()))
            .bind(("b", b.to_string()))
            .bind(("status", required_status))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to delete friendships: {}", e)))?;

        let deleted: Vec<SurrealFriendship> = response
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract friendships: {}", e)))?;

        tracing::debug!(a, b, removed = deleted.len(), "Deleted friendship records");
        Ok(!deleted.is_empty())
    }

    async fn list_friendships_for(
        &self,
        user_id: &str,
        statuses: &[FriendshipStatus],
    ) -> Result<Vec<Friendship>, StorageError> {
        let mut response = self
            .client
            .query(
                "SELECT * FROM friendship \
                 WHERE (requester = $user OR recipient = $user) AND status IN $statuses \
                 ORDER BY created_at ASC",
            )
            .bind(("user", user_id.to_string()))
            .bind(("statuses", statuses.to_vec()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to list friendships: {}", e)))?;

        let records: Vec<SurrealFriendship> = response
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract friendships: {}", e)))?;

        Ok(records.into_iter().map(Friendship::from).collect())
    }
}
