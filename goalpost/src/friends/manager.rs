//! Friend request state machine

use std::collections::HashMap;
use std::sync::Arc;

use super::FriendRequestTarget;
use super::locks::PairLocks;
use super::view::{FriendsView, build_friends_view};
use crate::models::{Friendship, FriendshipStatus, PublicUser, pair_key, pair_key_of_record};
use crate::storage::StorageError;
use crate::storage::traits::AppStore;
use crate::{GoalpostError, Result};

/// Friendship operations on behalf of an authenticated caller.
///
/// The caller id is always passed in explicitly; authorization (only the
/// recipient accepts, only the parties touch a request) is part of each
/// transition. Transitions on the same pair of users are serialized, so a
/// request that is being accepted cannot be cancelled at the same time.
#[derive(Debug, Clone)]
pub struct FriendshipManager {
    storage: Arc<dyn AppStore>,
    locks: Arc<PairLocks>,
}

fn require_id<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(GoalpostError::Validation(format!("{} is required", what)))
    } else {
        Ok(trimmed)
    }
}

impl FriendshipManager {
    /// Create a new friendship manager
    pub fn new(storage: Arc<dyn AppStore>) -> Self {
        Self {
            storage,
            locks: Arc::new(PairLocks::default()),
        }
    }

    /// Send a friend request from `requester` to `target`.
    ///
    /// Fails with `NotFound` if the target user does not exist, `Validation`
    /// if it is the requester, and `Conflict` if any record already exists
    /// between the two users in either direction.
    pub async fn send_request(
        &self,
        requester: &str,
        target: FriendRequestTarget,
    ) -> Result<Friendship> {
        let requester = require_id(requester, "Requester id")?;

        let recipient = match &target {
            FriendRequestTarget::Id(id) => {
                let id = require_id(id, "Friend id")?;
                self.storage.get_user(id).await?
            }
            FriendRequestTarget::Username(username) => {
                let username = require_id(username, "Username")?;
                self.storage.find_user_by_username(username).await?
            }
        }
        .ok_or_else(|| match &target {
            FriendRequestTarget::Id(id) => GoalpostError::not_found("User", id),
            FriendRequestTarget::Username(name) => GoalpostError::not_found("User", name),
        })?;

        if recipient.id == requester {
            return Err(GoalpostError::Validation(
                "You cannot send a friend request to yourself".to_string(),
            ));
        }

        let _pair = self.locks.lock(&pair_key(requester, &recipient.id)).await;

        if let Some(existing) = self
            .storage
            .find_friendship_between(requester, &recipient.id)
            .await?
        {
            tracing::debug!(
                requester,
                recipient = %recipient.id,
                status = %existing.status,
                "Friend request rejected, pair already has a record"
            );
            return Err(GoalpostError::Conflict(format!(
                "A friendship or request with '{}' already exists",
                recipient.username
            )));
        }

        let friendship = self
            .storage
            .create_friendship(requester, &recipient.id, FriendshipStatus::Pending)
            .await
            .map_err(|e| match e {
                StorageError::AlreadyExists(_) => GoalpostError::Conflict(format!(
                    "A friendship or request with '{}' already exists",
                    recipient.username
                )),
                other => other.into(),
            })?;

        tracing::info!(
            request_id = %friendship.id,
            requester,
            recipient = %recipient.id,
            "Friend request sent"
        );
        Ok(friendship)
    }

    /// Load the pending request `request_id` and the caller's side of it.
    ///
    /// Must run under the request's pair lock. Missing records and records
    /// where the caller is not on the `expected` side are indistinguishable
    /// to the caller.
    async fn request_for(
        &self,
        caller: &str,
        request_id: &str,
        expected: Option<Role>,
    ) -> Result<(Friendship, Role)> {
        let (record, role) = self
            .storage
            .get_friendship(request_id)
            .await?
            .and_then(|record| {
                let role = Role::of(&record, caller)?;
                if expected.is_some_and(|expected| expected != role) {
                    return None;
                }
                Some((record, role))
            })
            .ok_or_else(|| GoalpostError::not_found("Friend request", request_id))?;

        if record.status != FriendshipStatus::Pending {
            return Err(GoalpostError::Conflict(format!(
                "Friend request '{}' is already {}",
                request_id, record.status
            )));
        }

        Ok((record, role))
    }

    /// Accept a pending request addressed to `caller`.
    ///
    /// Marks the request accepted and writes the mirrored record in one
    /// transaction. Returns the accepted request.
    pub async fn accept_request(&self, caller: &str, request_id: &str) -> Result<Friendship> {
        let caller = require_id(caller, "Caller id")?;
        let request_id = require_id(request_id, "Request id")?;

        let _pair = self.locks.lock(pair_key_of_record(request_id)).await;
        let (request, _) = self
            .request_for(caller, request_id, Some(Role::Recipient))
            .await?;

        match self.storage.accept_friendship(&request.id).await {
            Ok((accepted, mirror)) => {
                tracing::info!(
                    request_id = %accepted.id,
                    mirror_id = %mirror.id,
                    requester = %accepted.requester,
                    recipient = %accepted.recipient,
                    "Friend request accepted"
                );
                Ok(accepted)
            }
            Err(StorageError::Transaction(message)) => {
                tracing::warn!(request_id = %request.id, %message, "Accept rolled back");
                match self.storage.get_friendship(&request.id).await? {
                    Some(current) if current.status != FriendshipStatus::Pending => {
                        Err(GoalpostError::Conflict(format!(
                            "Friend request '{}' is already {}",
                            request.id, current.status
                        )))
                    }
                    // Still pending: the mirror slot is taken by a stale record.
                    Some(_) => Err(GoalpostError::Conflict(format!(
                        "Friend request '{}' cannot be accepted while another record exists for this pair",
                        request.id
                    ))),
                    None => Err(GoalpostError::not_found("Friend request", &request.id)),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Reject a pending request addressed to `caller`
    pub async fn reject_request(&self, caller: &str, request_id: &str) -> Result<()> {
        self.withdraw(caller, request_id, Some(Role::Recipient))
            .await
            .map(|_| ())
    }

    /// Withdraw a pending request sent by `caller`
    pub async fn cancel_request(&self, caller: &str, request_id: &str) -> Result<()> {
        self.withdraw(caller, request_id, Some(Role::Requester))
            .await
            .map(|_| ())
    }

    /// Reject or cancel, whichever side of the request `caller` is on
    pub async fn dismiss_request(&self, caller: &str, request_id: &str) -> Result<()> {
        self.withdraw(caller, request_id, None).await.map(|_| ())
    }

    /// Delete a pending request under its pair lock; returns the caller's side.
    async fn withdraw(
        &self,
        caller: &str,
        request_id: &str,
        expected: Option<Role>,
    ) -> Result<Role> {
        let caller = require_id(caller, "Caller id")?;
        let request_id = require_id(request_id, "Request id")?;

        let _pair = self.locks.lock(pair_key_of_record(request_id)).await;
        let (request, role) = self.request_for(caller, request_id, expected).await?;

        let deleted = self
            .storage
            .delete_friendship(&request.id, FriendshipStatus::Pending)
            .await?;
        if !deleted {
            return Err(GoalpostError::not_found("Friend request", &request.id));
        }

        match role {
            Role::Recipient => tracing::info!(
                request_id = %request.id,
                recipient = %request.recipient,
                "Friend request rejected"
            ),
            Role::Requester => tracing::info!(
                request_id = %request.id,
                requester = %request.requester,
                "Friend request cancelled"
            ),
        }
        Ok(role)
    }

    /// End an accepted friendship between `caller` and `other`.
    ///
    /// Both mirrored records are deleted in a single statement. `NotFound`
    /// if the two are not friends.
    pub async fn remove_friendship(&self, caller: &str, other: &str) -> Result<()> {
        let caller = require_id(caller, "Caller id")?;
        let other = require_id(other, "Friend id")?;

        let _pair = self.locks.lock(&pair_key(caller, other)).await;
        let removed = self
            .storage
            .delete_friendships_between(caller, other, FriendshipStatus::Accepted)
            .await?;

        if !removed {
            return Err(GoalpostError::NotFound(format!(
                "No friendship with '{}'",
                other
            )));
        }

        tracing::info!(user = caller, friend = other, "Friendship removed");
        Ok(())
    }

    /// Whether `a` and `b` are accepted friends; symmetric
    pub async fn are_friends(&self, a: &str, b: &str) -> Result<bool> {
        if a == b {
            return Ok(false);
        }
        // The first record of a pair always lives under the pair key.
        let record = self.storage.get_friendship(&pair_key(a, b)).await?;
        Ok(record.is_some_and(|r| r.status == FriendshipStatus::Accepted))
    }

    /// Accepted friends plus incoming and outgoing pending requests for `caller`
    pub async fn friends_view(&self, caller: &str) -> Result<FriendsView> {
        let caller = require_id(caller, "Caller id")?;

        let records = self
            .storage
            .list_friendships_for(
                caller,
                &[FriendshipStatus::Pending, FriendshipStatus::Accepted],
            )
            .await?;

        let mut other_ids: Vec<String> = records
            .iter()
            .filter_map(|r| r.counterpart(caller))
            .map(str::to_string)
            .collect();
        other_ids.sort();
        other_ids.dedup();

        let users: HashMap<String, PublicUser> = self
            .storage
            .get_users(&other_ids)
            .await?
            .into_iter()
            .map(|user| (user.id.clone(), PublicUser::from(user)))
            .collect();

        let view = build_friends_view(caller, &records, &users);
        tracing::debug!(
            caller,
            friends = view.accepted_friends.len(),
            received = view.pending_received_requests.len(),
            sent = view.sent_requests.len(),
            "Built friends view"
        );
        Ok(view)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Requester,
    Recipient,
}

impl Role {
    fn of(record: &Friendship, caller: &str) -> Option<Role> {
        if record.requester == caller {
            Some(Role::Requester)
        } else if record.recipient == caller {
            Some(Role::Recipient)
        } else {
            None
        }
    }
}
