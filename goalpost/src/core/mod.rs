//! Backend handle

use std::sync::Arc;

use crate::config::GoalpostConfig;
use crate::friends::FriendshipManager;
use crate::goals::GoalManager;
use crate::storage::traits::AppStore;

/// One store plus the managers that operate on it.
///
/// Cheap to clone; the server keeps one in its shared state.
#[derive(Debug, Clone)]
pub struct Backend {
    storage: Arc<dyn AppStore>,
    friends: FriendshipManager,
    goals: GoalManager,
    config: GoalpostConfig,
}

impl Backend {
    /// Wire the managers to `storage`
    pub fn new(storage: Arc<dyn AppStore>, config: GoalpostConfig) -> Self {
        let friends = FriendshipManager::new(Arc::clone(&storage));
        let goals = GoalManager::new(Arc::clone(&storage), friends.clone());

        Self {
            storage,
            friends,
            goals,
            config,
        }
    }

    /// Friend requests, friendships and the friends view
    pub fn friends(&self) -> &FriendshipManager {
        &self.friends
    }

    /// Goals and goal sharing
    pub fn goals(&self) -> &GoalManager {
        &self.goals
    }

    /// Direct store access, used for user accounts
    pub fn storage(&self) -> &Arc<dyn AppStore> {
        &self.storage
    }

    pub fn config(&self) -> &GoalpostConfig {
        &self.config
    }
}
