//! Data transfer objects for the Goalpost API

use chrono::{DateTime, Utc};
use goalpost::friends::{FriendsView, PendingRequest};
use goalpost::models::{Friendship, Goal, PublicUser, User};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Public identity of a user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub email: String,
}

impl From<PublicUser> for UserDto {
    fn from(user: PublicUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        PublicUser::from(user).into()
    }
}

/// A directed friendship record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FriendshipDto {
    pub id: String,
    pub requester: String,
    pub recipient: String,
    /// `pending` or `accepted`
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Friendship> for FriendshipDto {
    fn from(friendship: Friendship) -> Self {
        Self {
            id: friendship.id,
            requester: friendship.requester,
            recipient: friendship.recipient,
            status: friendship.status.to_string(),
            created_at: friendship.created_at,
            updated_at: friendship.updated_at,
        }
    }
}

/// A pending request as seen by one of its parties
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PendingRequestDto {
    /// Request id, used to accept, reject or cancel
    pub id: String,
    pub requester: String,
    pub recipient: String,
    /// The other party
    pub user: UserDto,
    pub created_at: DateTime<Utc>,
}

impl From<PendingRequest> for PendingRequestDto {
    fn from(request: PendingRequest) -> Self {
        Self {
            id: request.id,
            requester: request.requester,
            recipient: request.recipient,
            user: request.user.into(),
            created_at: request.created_at,
        }
    }
}

/// The caller's friends screen
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FriendsViewDto {
    pub accepted_friends: Vec<UserDto>,
    pub pending_received_requests: Vec<PendingRequestDto>,
    pub sent_requests: Vec<PendingRequestDto>,
}

impl From<FriendsView> for FriendsViewDto {
    fn from(view: FriendsView) -> Self {
        Self {
            accepted_friends: view.accepted_friends.into_iter().map(Into::into).collect(),
            pending_received_requests: view
                .pending_received_requests
                .into_iter()
                .map(Into::into)
                .collect(),
            sent_requests: view.sent_requests.into_iter().map(Into::into).collect(),
        }
    }
}

/// Send a friend request by user id or by username
#[derive(Debug, Deserialize, ToSchema)]
pub struct FriendRequestBody {
    #[serde(default, alias = "friendId")]
    pub friend_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// A goal
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GoalDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub deadline: DateTime<Utc>,
    pub owner: String,
    pub shared_with: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Goal> for GoalDto {
    fn from(goal: Goal) -> Self {
        Self {
            id: goal.id,
            title: goal.title,
            description: goal.description,
            deadline: goal.deadline,
            owner: goal.owner,
            shared_with: goal.shared_with,
            created_at: goal.created_at,
            updated_at: goal.updated_at,
        }
    }
}

/// Create a goal
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateGoalRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    /// RFC 3339 timestamp
    pub deadline: Option<DateTime<Utc>>,
}

/// Share a goal with a friend
#[derive(Debug, Deserialize, ToSchema)]
pub struct ShareGoalRequest {
    #[serde(default, alias = "friendId")]
    pub friend_id: Option<String>,
}

/// Plain acknowledgement
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
