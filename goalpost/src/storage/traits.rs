//! Trait definitions for storage components in Goalpost

use async_trait::async_trait;
use std::fmt::Debug;

use crate::models::{Friendship, FriendshipStatus, Goal, NewGoal, NewUser, User};
use crate::storage::errors::StorageResult;

/// Base trait for all storage implementations
#[async_trait]
pub trait BaseStore: Send + Sync + 'static + Debug {
    /// Check if the store is healthy and available
    async fn health_check(&self) -> StorageResult<bool>;

    /// Clear all data in the store
    async fn clear(&self) -> StorageResult<()>;

    /// Get metadata about the store
    async fn get_metadata(&self) -> StorageResult<serde_json::Value>;

    /// Close connections and release resources
    async fn close(&self) -> StorageResult<()>;
}

/// Trait for user account operations
#[async_trait]
pub trait UserStore: BaseStore {
    /// Create a user; `AlreadyExists` if the username or email is taken
    async fn create_user(&self, user: NewUser) -> StorageResult<User>;

    /// Get a user by id
    async fn get_user(&self, id: &str) -> StorageResult<Option<User>>;

    /// Get several users by id, skipping unknown ids
    async fn get_users(&self, ids: &[String]) -> StorageResult<Vec<User>>;

    /// Find a user by exact username
    async fn find_user_by_username(&self, username: &str) -> StorageResult<Option<User>>;

    /// Find a user by exact email
    async fn find_user_by_email(&self, email: &str) -> StorageResult<Option<User>>;

    /// List users ordered by username, optionally leaving one out
    async fn list_users(&self, exclude: Option<&str>) -> StorageResult<Vec<User>>;
}

/// Trait for goal operations
#[async_trait]
pub trait GoalStore: BaseStore {
    /// Create a goal owned by `owner`
    async fn create_goal(&self, owner: &str, goal: NewGoal) -> StorageResult<Goal>;

    /// Get a goal by id
    async fn get_goal(&self, id: &str) -> StorageResult<Option<Goal>>;

    /// Goals owned by a user, oldest first
    async fn list_goals_by_owner(&self, owner: &str) -> StorageResult<Vec<Goal>>;

    /// Goals shared with a user, oldest first
    async fn list_goals_shared_with(&self, user_id: &str) -> StorageResult<Vec<Goal>>;

    /// Add a user to a goal's share set; `NotFound` if the goal is missing
    async fn add_goal_share(&self, goal_id: &str, user_id: &str) -> StorageResult<Goal>;

    /// Delete a goal by id
    async fn delete_goal(&self, id: &str) -> StorageResult<bool>;
}

/// Fields of a friendship record that may change after creation
#[derive(Debug, Clone, Default)]
pub struct FriendshipUpdate {
    pub status: Option<FriendshipStatus>,
}

/// Trait for directed friendship records.
///
/// Every lookup between two users is direction-agnostic: it matches
/// `(requester = a, recipient = b)` as well as `(requester = b, recipient = a)`.
#[async_trait]
pub trait FriendshipStore: BaseStore {
    /// Create a record; `AlreadyExists` if any record exists for the pair
    async fn create_friendship(
        &self,
        requester: &str,
        recipient: &str,
        status: FriendshipStatus,
    ) -> StorageResult<Friendship>;

    /// Get a record by id
    async fn get_friendship(&self, id: &str) -> StorageResult<Option<Friendship>>;

    /// Oldest record between two users, in either direction
    async fn find_friendship_between(&self, a: &str, b: &str)
    -> StorageResult<Option<Friendship>>;

    /// Update a record; `NotFound` if it does not exist
    async fn update_friendship(
        &self,
        id: &str,
        update: FriendshipUpdate,
    ) -> StorageResult<Friendship>;

    /// Mark a pending record accepted and write its mirror, atomically.
    ///
    /// Returns `(accepted, mirror)`. Fails with `Transaction` and leaves
    /// both records untouched if the record is no longer pending or the
    /// mirror cannot be written.
    async fn accept_friendship(&self, id: &str) -> StorageResult<(Friendship, Friendship)>;

    /// Delete one record if its status matches
    async fn delete_friendship(
        &self,
        id: &str,
        required_status: FriendshipStatus,
    ) -> StorageResult<bool>;

    /// Delete every record between two users, in either direction, whose
    /// status matches. Returns whether anything was deleted.
    async fn delete_friendships_between(
        &self,
        a: &str,
        b: &str,
        required_status: FriendshipStatus,
    ) -> StorageResult<bool>;

    /// Records touching `user_id` on either side with one of `statuses`,
    /// in creation order
    async fn list_friendships_for(
        &self,
        user_id: &str,
        statuses: &[FriendshipStatus],
    ) -> StorageResult<Vec<Friendship>>;
}

/// Everything the managers need from one backend
pub trait AppStore: UserStore + GoalStore + FriendshipStore {}

impl<T> AppStore for T where T: UserStore + GoalStore + FriendshipStore {}
