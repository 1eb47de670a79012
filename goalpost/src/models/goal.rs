use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A goal owned by one user and optionally shared with friends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub description: String,
    pub deadline: DateTime<Utc>,
    pub owner: String,
    /// User ids the goal is shared with; no duplicates
    pub shared_with: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    /// Owner or anyone the goal has been shared with
    pub fn is_visible_to(&self, user_id: &str) -> bool {
        self.owner == user_id || self.shared_with.iter().any(|id| id == user_id)
    }
}

/// Fields a caller supplies when creating a goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGoal {
    pub title: String,
    pub description: String,
    pub deadline: DateTime<Utc>,
}
