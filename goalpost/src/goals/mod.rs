//! Goals and goal sharing

use std::sync::Arc;

use crate::friends::FriendshipManager;
use crate::models::Goal;
use crate::storage::traits::AppStore;
use crate::{GoalpostError, Result};

pub use crate::models::NewGoal;

/// Goal operations on behalf of an authenticated caller.
#[derive(Debug, Clone)]
pub struct GoalManager {
    storage: Arc<dyn AppStore>,
    friends: FriendshipManager,
}

impl GoalManager {
    /// Create a new goal manager
    pub fn new(storage: Arc<dyn AppStore>, friends: FriendshipManager) -> Self {
        Self { storage, friends }
    }

    /// Create a goal owned by `caller`
    pub async fn add_goal(&self, caller: &str, goal: NewGoal) -> Result<Goal> {
        if goal.title.trim().is_empty() || goal.description.trim().is_empty() {
            return Err(GoalpostError::Validation(
                "Title and description are required".to_string(),
            ));
        }

        let goal = self.storage.create_goal(caller, goal).await?;
        tracing::info!(goal_id = %goal.id, owner = caller, "Goal created");
        Ok(goal)
    }

    /// Goals owned by `caller`, oldest first
    pub async fn list_goals(&self, caller: &str) -> Result<Vec<Goal>> {
        Ok(self.storage.list_goals_by_owner(caller).await?)
    }

    /// A goal the caller owns or that has been shared with them
    pub async fn get_goal(&self, caller: &str, goal_id: &str) -> Result<Goal> {
        self.storage
            .get_goal(goal_id)
            .await?
            .filter(|goal| goal.is_visible_to(caller))
            .ok_or_else(|| GoalpostError::not_found("Goal", goal_id))
    }

    async fn owned_goal(&self, caller: &str, goal_id: &str) -> Result<Goal> {
        self.storage
            .get_goal(goal_id)
            .await?
            .filter(|goal| goal.owner == caller)
            .ok_or_else(|| GoalpostError::not_found("Goal", goal_id))
    }

    /// Share one of the caller's goals with an accepted friend.
    ///
    /// Sharing twice with the same friend leaves a single entry.
    pub async fn share_goal(&self, caller: &str, goal_id: &str, friend_id: &str) -> Result<Goal> {
        let friend_id = friend_id.trim();
        if friend_id.is_empty() {
            return Err(GoalpostError::Validation("Friend id is required".to_string()));
        }

        let goal = self.owned_goal(caller, goal_id).await?;

        if !self.friends.are_friends(caller, friend_id).await? {
            return Err(GoalpostError::Validation(format!(
                "Goals can only be shared with friends; '{}' is not a friend",
                friend_id
            )));
        }

        if goal.shared_with.iter().any(|id| id == friend_id) {
            return Ok(goal);
        }

        let goal = self.storage.add_goal_share(&goal.id, friend_id).await?;
        tracing::info!(goal_id = %goal.id, owner = caller, friend = friend_id, "Goal shared");
        Ok(goal)
    }

    /// Goals other users have shared with `caller`
    pub async fn list_shared_goals(&self, caller: &str) -> Result<Vec<Goal>> {
        Ok(self.storage.list_goals_shared_with(caller).await?)
    }

    /// Delete one of the caller's goals
    pub async fn delete_goal(&self, caller: &str, goal_id: &str) -> Result<()> {
        let goal = self.owned_goal(caller, goal_id).await?;
        if !self.storage.delete_goal(&goal.id).await? {
            return Err(GoalpostError::not_found("Goal", goal_id));
        }
        tracing::info!(goal_id = %goal.id, owner = caller, "Goal deleted");
        Ok(())
    }
}
