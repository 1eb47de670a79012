//! Goal storage implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, RecordId};

use super::base::SharedStorage;
use super::record_key;
use crate::models::{Goal, NewGoal};
use crate::storage::errors::StorageError;
use crate::storage::traits::GoalStore;

/// Internal representation of a Goal record for SurrealDB
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct SurrealGoal {
    id: RecordId,
    title: String,
    description: String,
    deadline: String,
    owner: String,
    #[serde(default)]
    shared_with: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Struct for creating goals (timestamps handled by SurrealDB)
#[derive(Debug, Clone, serde::Serialize)]
struct CreateGoal {
    title: String,
    description: String,
    deadline: String,
    owner: String,
    shared_with: Vec<String>,
}

impl TryFrom<SurrealGoal> for Goal {
    type Error = StorageError;

    fn try_from(surreal_goal: SurrealGoal) -> Result<Self, Self::Error> {
        let deadline = DateTime::parse_from_rfc3339(&surreal_goal.deadline)
            .map_err(|e| {
                StorageError::Internal(format!(
                    "Invalid deadline '{}' on goal: {}",
                    surreal_goal.deadline, e
                ))
            })?
            .with_timezone(&Utc);

        Ok(Self {
            id: record_key(&surreal_goal.id),
            title: surreal_goal.title,
            description: surreal_goal.description,
            deadline,
            owner: surreal_goal.owner,
            shared_with: surreal_goal.shared_with,
            created_at: surreal_goal.created_at,
            updated_at: surreal_goal.updated_at,
        })
    }
}

fn into_goals(records: Vec<SurrealGoal>) -> Result<Vec<Goal>, StorageError> {
    records.into_iter().map(Goal::try_from).collect()
}

#[async_trait]
impl<C> GoalStore for SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn create_goal(&self, owner: &str, goal: NewGoal) -> Result<Goal, StorageError> {
        let create_goal = CreateGoal {
            title: goal.title,
            description: goal.description,
            deadline: goal.deadline.to_rfc3339(),
            owner: owner.to_string(),
            shared_with: Vec::new(),
        };

        let created: Option<SurrealGoal> = self
            .client
            .create("goal")
            .content(create_goal)
            .await
            .map_err(|e| StorageError::Query(format!("Failed to create goal: {}", e)))?;

        created
            .ok_or_else(|| StorageError::Internal("No goal created".to_string()))
            .and_then(Goal::try_from)
    }

    async fn get_goal(&self, id: &str) -> Result<Option<Goal>, StorageError> {
        let goal: Option<SurrealGoal> = self
            .client
            .select(("goal", id))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to get goal: {}", e)))?;

        goal.map(Goal::try_from).transpose()
    }

    async fn list_goals_by_owner(&self, owner: &str) -> Result<Vec<Goal>, StorageError> {
        let mut response = self
            .client
            .query("SELECT * FROM goal WHERE owner = $owner ORDER BY created_at ASC")
            .bind(("owner", owner.to_string()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to list goals: {}", e)))?;

        let goals: Vec<SurrealGoal> = response
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract goals: {}", e)))?;

        into_goals(goals)
    }

    async fn list_goals_shared_with(&self, user_id: &str) -> Result<Vec<Goal>, StorageError> {
        let mut response = self
            .client
            .query("SELECT * FROM goal WHERE shared_with CONTAINS $user ORDER BY created_at ASC")
            .bind(("user", user_id.to_string()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to list shared goals: {}", e)))?;

        let goals: Vec<SurrealGoal> = response
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract shared goals: {}", e)))?;

        into_goals(goals)
    }

    async fn add_goal_share(&self, goal_id: &str, user_id: &str) -> Result<Goal, StorageError> {
        let mut response = self
            .client
            .query("UPDATE $goal SET shared_with = array::union(shared_with, [$user]) RETURN AFTER")
            .bind(("goal", RecordId::from(("goal", goal_id))))
            .bind(("user", user_id.to_string()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to share goal: {}", e)))?;

        let updated: Vec<SurrealGoal> = response
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract shared goal: {}", e)))?;

        updated
            .into_iter()
            .next()
            .ok_or_else(|| StorageError::NotFound(format!("Goal '{}' not found", goal_id)))
            .and_then(Goal::try_from)
    }

    async fn delete_goal(&self, id: &str) -> Result<bool, StorageError> {
        let mut response = self
            .client
            .query("DELETE $goal RETURN BEFORE")
            .bind(("goal", RecordId::from(("goal", id))))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to delete goal: {}", e)))?;

        let deleted: Vec<SurrealGoal> = response
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract deleted goal: {}", e)))?;

        Ok(!deleted.is_empty())
    }
}
